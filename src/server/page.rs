//! HTML pages. Each page is a static shell; its script fetches the JSON
//! endpoints and draws the returned figures with Chart.js.

/// Constants for page layout
mod page_constants {
    /// Chart.js CDN URL for rendering charts
    pub const CHART_JS_CDN: &str = "https://cdn.jsdelivr.net/npm/chart.js";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Selector,
    Distribution,
}

impl Page {
    fn id(self) -> &'static str {
        match self {
            Page::Selector => "selector",
            Page::Distribution => "distribution",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Page::Selector => "Create Up to 4 Charts on One Screen",
            Page::Distribution => "Enrollment Distribution",
        }
    }
}

pub fn selector_page(title: &str) -> String {
    generate_html_content(title, Page::Selector)
}

pub fn distribution_page(title: &str) -> String {
    generate_html_content(title, Page::Distribution)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Generate the complete HTML document content
fn generate_html_content(title: &str, page: Page) -> String {
    let title = escape_html(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="{cdn}"></script>
    <style>{css}</style>
</head>
<body data-page="{page_id}">
    {body}
    <script>{js}</script>
</body>
</html>"#,
        cdn = page_constants::CHART_JS_CDN,
        css = generate_css(),
        page_id = page.id(),
        body = generate_body_content(&title, page),
        js = generate_javascript(),
    )
}

fn generate_body_content(title: &str, page: Page) -> String {
    let main = match page {
        Page::Selector => {
            r#"<section id="preview-section" class="hidden">
            <h2>Preview Data</h2>
            <div id="preview" class="table-wrap"></div>
        </section>
        <section id="content-section" class="hidden">
            <h2>__HEADING__</h2>
            <div id="panels" class="grid"></div>
        </section>"#
        }
        Page::Distribution => {
            r#"<section id="content-section" class="hidden">
            <h2>__HEADING__</h2>
            <div id="sections"></div>
        </section>"#
        }
    }
    .replace("__HEADING__", page.heading());

    let (charts_class, distribution_class) = match page {
        Page::Selector => ("active", ""),
        Page::Distribution => ("", "active"),
    };

    format!(
        r#"<div class="container">
        <header class="header">
            <h1>{title}</h1>
            <nav>
                <a href="/" class="{charts_class}">Charts</a>
                <a href="/distribution" class="{distribution_class}">Distribution</a>
                <button id="refresh" type="button">Refresh data</button>
            </nav>
        </header>
        <div id="banner"></div>
        {main}
    </div>"#
    )
}

fn generate_css() -> &'static str {
    r#"
        :root {
            --primary-color: #2563eb;
            --success-color: #059669;
            --warning-color: #d97706;
            --error-color: #dc2626;
            --bg-color: #f8fafc;
            --card-bg: #ffffff;
            --border-color: #e2e8f0;
            --text-primary: #1e293b;
            --text-secondary: #64748b;
        }

        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background-color: var(--bg-color);
            color: var(--text-primary);
            line-height: 1.6;
        }

        .container { max-width: 1400px; margin: 0 auto; padding: 2rem; }

        .header {
            display: flex;
            justify-content: space-between;
            align-items: center;
            margin-bottom: 1.5rem;
        }
        .header h1 { font-size: 1.8rem; }
        .header nav { display: flex; gap: 1rem; align-items: center; }
        .header nav a { color: var(--text-secondary); text-decoration: none; font-weight: 500; }
        .header nav a.active { color: var(--primary-color); }

        button {
            background: var(--primary-color);
            color: #fff;
            border: none;
            border-radius: 6px;
            padding: 0.4rem 0.9rem;
            cursor: pointer;
        }

        h2 { margin: 1.5rem 0 0.75rem; font-size: 1.3rem; }
        h3 { font-size: 1.05rem; margin-bottom: 0.5rem; }

        .banner { padding: 0.75rem 1rem; border-radius: 8px; margin-bottom: 0.5rem; }
        .banner.ok { background: #ecfdf5; color: var(--success-color); }
        .banner.warning { background: #fffbeb; color: var(--warning-color); }
        .banner.error { background: #fef2f2; color: var(--error-color); }

        .grid { display: grid; grid-template-columns: repeat(2, minmax(0, 1fr)); gap: 1.5rem; }
        @media (max-width: 900px) { .grid { grid-template-columns: 1fr; } }

        .panel {
            background: var(--card-bg);
            border: 1px solid var(--border-color);
            border-radius: 12px;
            padding: 1.25rem;
            margin-bottom: 1.25rem;
        }
        .controls { display: flex; flex-wrap: wrap; gap: 0.75rem; margin-bottom: 0.75rem; }
        .controls label { display: flex; flex-direction: column; font-size: 0.85rem; color: var(--text-secondary); }
        .controls select { margin-top: 0.2rem; padding: 0.3rem; min-width: 10rem; }

        .chart-wrap { position: relative; width: 100%; }
        .notice { color: var(--text-secondary); font-style: italic; }
        .notice.error { color: var(--error-color); font-style: normal; }
        .muted { color: var(--text-secondary); font-size: 0.85rem; }

        .table-wrap { overflow-x: auto; background: var(--card-bg); border-radius: 8px; }
        table { border-collapse: collapse; width: 100%; font-size: 0.85rem; }
        th, td { border-bottom: 1px solid var(--border-color); padding: 0.4rem 0.6rem; text-align: left; white-space: nowrap; }
        th { background: var(--bg-color); }

        .hidden { display: none; }
    "#
}

fn generate_javascript() -> &'static str {
    r##"
        const charts = {};

        function escapeHtml(value) {
            return String(value ?? '')
                .replace(/&/g, '&amp;')
                .replace(/</g, '&lt;')
                .replace(/>/g, '&gt;')
                .replace(/"/g, '&quot;')
                .replace(/'/g, '&#39;');
        }

        async function fetchJson(url, options) {
            const response = await fetch(url, options);
            const body = await response.json();
            if (!response.ok) {
                throw new Error(body.error || response.statusText);
            }
            return body;
        }

        function destroyChart(key) {
            if (charts[key]) {
                charts[key].destroy();
                delete charts[key];
            }
        }

        function destroyAll() {
            Object.keys(charts).forEach(destroyChart);
        }

        function drawFigure(container, key, figure) {
            destroyChart(key);
            container.innerHTML = '';

            const wrap = document.createElement('div');
            wrap.className = 'chart-wrap';
            wrap.style.height = figure.height + 'px';
            const canvas = document.createElement('canvas');
            wrap.appendChild(canvas);
            container.appendChild(wrap);

            const options = figure.options || {};
            options.plugins = options.plugins || {};
            if (figure.data.datasets.some(d => d.hoverText)) {
                options.plugins.tooltip = {
                    callbacks: { label: ctx => ctx.dataset.hoverText[ctx.dataIndex] }
                };
            }
            const x = options.scales && options.scales.x;
            if (x && x.ticks && x.ticks.absolute) {
                delete x.ticks.absolute;
                x.ticks.callback = value => Math.abs(value);
            }

            charts[key] = new Chart(canvas, { type: figure.type, data: figure.data, options });
        }

        function drawBody(container, key, body) {
            if (body.kind === 'chart') {
                drawFigure(container, key, body.content);
                return;
            }
            destroyChart(key);
            container.innerHTML =
                `<p class="notice ${body.kind}">${escapeHtml(body.content)}</p>`;
        }

        function showBanner(status, message) {
            const banner = document.getElementById('banner');
            banner.innerHTML += `<div class="banner ${status}">${escapeHtml(message)}</div>`;
        }

        function renderPreview(preview) {
            const el = document.getElementById('preview');
            const head = preview.columns.map(c => `<th>${escapeHtml(c)}</th>`).join('');
            const rows = preview.rows
                .map(row => '<tr>' + row.map(v => `<td>${escapeHtml(v)}</td>`).join('') + '</tr>')
                .join('');
            el.innerHTML = `<table><thead><tr>${head}</tr></thead><tbody>${rows}</tbody></table>`;
            document.getElementById('preview-section').classList.remove('hidden');
        }

        // Returns the dataset summary, or null when there is nothing to chart
        async function loadDataset(url, options) {
            document.getElementById('banner').innerHTML = '';
            const data = await fetchJson(url, options);
            showBanner(data.status, data.message);
            if (data.notice) {
                if (data.notice !== data.message) {
                    showBanner('warning', data.notice);
                }
                return null;
            }
            return data;
        }

        function renderPanel(view) {
            const root = document.getElementById('panels');
            let el = document.getElementById('panel-' + view.index);
            if (!el) {
                el = document.createElement('div');
                el.id = 'panel-' + view.index;
                el.className = 'panel';
                root.appendChild(el);
            }

            const kinds = view.kinds
                .map(k => `<option value="${escapeHtml(k)}" ${k === view.state.kind ? 'selected' : ''}>${escapeHtml(k)}</option>`)
                .join('');
            const selects = view.controls
                .map(c => {
                    const options = view.columns
                        .map(col => `<option value="${escapeHtml(col)}" ${col === c.selected ? 'selected' : ''}>${escapeHtml(col)}</option>`)
                        .join('');
                    return `<label>${escapeHtml(c.caption)}<select data-control="${c.control}">${options}</select></label>`;
                })
                .join('');

            el.innerHTML = `<h3>${escapeHtml(view.title)}</h3>
                <div class="controls">
                    <label>Chart Type ${view.index + 1}<select data-control="kind">${kinds}</select></label>
                    ${selects}
                </div>
                <div class="panel-body"></div>`;

            el.querySelectorAll('select').forEach(select => {
                select.addEventListener('change', () =>
                    sendEvent(view.index, select.dataset.control, select.value));
            });
            drawBody(el.querySelector('.panel-body'), 'panel-' + view.index, view.body);
        }

        async function sendEvent(index, control, value) {
            try {
                const view = await fetchJson('/api/panels/' + index, {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ control, value })
                });
                renderPanel(view);
            } catch (err) {
                showBanner('error', err.message);
            }
        }

        async function initSelector(data) {
            renderPreview(data.preview);
            const views = await fetchJson('/api/panels');
            document.getElementById('panels').innerHTML = '';
            views.forEach(renderPanel);
            document.getElementById('content-section').classList.remove('hidden');
        }

        async function initDistribution() {
            const view = await fetchJson('/api/distribution');
            const root = document.getElementById('sections');
            root.innerHTML = '';
            document.getElementById('content-section').classList.remove('hidden');

            if (view.notice || view.error) {
                const kind = view.error ? 'error' : 'notice';
                root.innerHTML = `<p class="notice ${kind}">${escapeHtml(view.error || view.notice)}</p>`;
                return;
            }

            let partition = null;
            view.sections.forEach((section, i) => {
                if (section.partition !== partition) {
                    partition = section.partition;
                    const heading = document.createElement('h3');
                    heading.textContent = partition;
                    root.appendChild(heading);
                }
                const card = document.createElement('div');
                card.className = 'panel';
                card.innerHTML = `<h3>${escapeHtml(section.title)}</h3>
                    <p class="muted">${section.rows} records</p>
                    <div class="panel-body"></div>`;
                root.appendChild(card);
                drawBody(card.querySelector('.panel-body'), 'section-' + i, section.body);
            });
        }

        async function init(url, options) {
            destroyAll();
            try {
                const data = await loadDataset(url, options);
                if (!data) {
                    return;
                }
                if (document.body.dataset.page === 'selector') {
                    await initSelector(data);
                } else {
                    await initDistribution();
                }
            } catch (err) {
                showBanner('error', err.message);
            }
        }

        document.addEventListener('DOMContentLoaded', () => {
            document.getElementById('refresh').addEventListener('click', () =>
                init('/api/refresh', { method: 'POST' }));
            init('/api/dataset');
        });
    "##
}
