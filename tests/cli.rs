mod cli {
    #![allow(non_snake_case)]

    use assert_cmd::prelude::*;
    use predicates::str::contains;

    use std::io::Write;
    use std::process::Command;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    const NAME: &str = "sheetdash";

    fn command() -> Result<Command, Box<dyn std::error::Error>> {
        let mut cmd = Command::cargo_bin(NAME)?;
        cmd.env_remove("AZURE_STORAGE_CONNECTION_STRING")
            .env_remove("AZURE_BLOB_CONTAINER")
            .env_remove("PORT");
        Ok(cmd)
    }

    #[test]
    fn test_help__lists_options() -> TestResult {
        let mut cmd = command()?;

        cmd.arg("--help");

        cmd.assert()
            .success()
            .stdout(contains("--port"))
            .stdout(contains("--container"))
            .stdout(contains("--no-config"));
        Ok(())
    }

    #[test]
    fn test_version() -> TestResult {
        let mut cmd = command()?;

        cmd.arg("--version");

        cmd.assert()
            .success()
            .stdout(contains(env!("CARGO_PKG_VERSION")));
        Ok(())
    }

    #[test]
    fn test_error__when_config_file_missing() -> TestResult {
        let mut cmd = command()?;

        cmd.args(["--config", "/path/that/does/not/exist.toml"]);

        cmd.assert()
            .failure()
            .stderr(contains("Could not read config file"));
        Ok(())
    }

    #[test]
    fn test_error__config_file_reported_once_with_path() -> TestResult {
        let mut cmd = command()?;

        cmd.args(["--config", "/path/that/does/not/exist.toml"]);

        let output = cmd.output()?;
        let stderr = String::from_utf8(output.stderr)?;

        assert!(!output.status.success());
        assert!(stderr.starts_with(
            "Error: Configuration error: Could not read config file '/path/that/does/not/exist.toml'"
        ));
        assert_eq!(stderr.matches("Could not read config file").count(), 1);
        Ok(())
    }

    #[test]
    fn test_error__when_config_file_invalid() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"port = \"not a number\"\n")?;
        let mut cmd = command()?;

        cmd.arg("--config").arg(file.path());

        cmd.assert()
            .failure()
            .stderr(contains("Invalid TOML in config file"));
        Ok(())
    }

    #[test]
    fn test_error__when_port_env_invalid() -> TestResult {
        let mut cmd = command()?;

        cmd.arg("--no-config").env("PORT", "eighty");

        cmd.assert()
            .failure()
            .stderr(contains("PORT must be a port number"));
        Ok(())
    }

    #[test]
    fn test_error__when_timeout_zero() -> TestResult {
        let mut cmd = command()?;

        cmd.args(["--no-config", "--timeout", "0"]);

        cmd.assert()
            .failure()
            .stderr(contains("Timeout cannot be 0"));
        Ok(())
    }

    #[test]
    fn test_error__when_port_zero() -> TestResult {
        let mut cmd = command()?;

        cmd.args(["--no-config", "--port", "0"]);

        cmd.assert()
            .failure()
            .stderr(contains("Port cannot be 0"));
        Ok(())
    }

    #[test]
    fn test_error__when_column_name_empty_in_config() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(b"status_column = \"  \"\n")?;
        let mut cmd = command()?;

        cmd.arg("--config").arg(file.path());

        cmd.assert()
            .failure()
            .stderr(contains("status_column cannot be empty"));
        Ok(())
    }

    #[test]
    fn test_error__unknown_flag() -> TestResult {
        let mut cmd = command()?;

        cmd.arg("--definitely-not-a-flag");

        cmd.assert().failure().stderr(contains("unexpected argument"));
        Ok(())
    }
}
