//! Standalone HTML page for exported documents.
//!
//! The page loads Tailwind, marked and highlight.js from CDNs, carries every
//! section's markdown escaped inside hidden containers and renders it in the
//! browser. A small script re-applies the alert rule to rendered blockquotes
//! using the pattern and style table serialized from `docflow-renderer`, so
//! both paths produce the same callouts.

use std::fmt::Write;

use docflow_renderer::{
    ALERT_BODY_CLASSES, ALERT_CONTAINER_CLASSES, ALERT_ICON_SIZE, ALERT_STYLES,
    ALERT_TITLE_CLASSES, AlertStyle, MARKDOWN_BODY_CSS, MarkdownRenderer, TAG_PATTERN_SOURCE,
    ThemedBackend, escape_html, wrap_markdown_body,
};
use serde::Serialize;

use crate::sections::{ExportDocument, Section};

/// Classes shared by every sidebar button.
pub const BUTTON_BASE_CLASSES: &str = "w-full text-left px-2 py-1.5 rounded-md text-sm transition-all duration-200 group flex items-center justify-between";

/// Classes added to the button of the visible section.
pub const BUTTON_ACTIVE_CLASSES: &str =
    "bg-[#5ABDAC]/10 text-[#5ABDAC] font-medium ring-1 ring-[#5ABDAC]/30";

/// Classes added to the buttons of hidden sections.
pub const BUTTON_INACTIVE_CLASSES: &str = "text-slate-400 hover:bg-slate-800 hover:text-slate-200";

const PROSE_CLASSES: &str = "prose prose-invert max-w-none prose-headings:font-bold prose-a:text-[#5ABDAC] hover:prose-a:text-[#7CD4C6] prose-h2:border-none prose-h2:pb-2";

const NAV_BUTTON_CLASSES: &str = "group w-full md:w-auto min-w-[200px] flex flex-col p-5 rounded-2xl border border-slate-800 bg-slate-900/30 hover:bg-slate-800/80 hover:border-[#5ABDAC]/30 transition-all duration-300";

const CHEVRON_LEFT: &str = "M15 19l-7-7 7-7";
const CHEVRON_RIGHT: &str = "M9 5l7 7-7 7";

/// Layout and sizing of the exported page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    /// Initial sidebar width in pixels.
    pub sidebar_width: u32,
    /// Lower bound of the draggable sidebar width.
    pub min_sidebar_width: u32,
    /// Upper bound of the draggable sidebar width.
    pub max_sidebar_width: u32,
    /// Render markdown ahead of time instead of in the browser.
    pub prerender: bool,
    /// Enable tables, strikethrough and task lists in both render paths.
    pub gfm: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            sidebar_width: 350,
            min_sidebar_width: 200,
            max_sidebar_width: 800,
            prerender: false,
            gfm: true,
        }
    }
}

/// Values the client script reads from the page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientConfig {
    tag_pattern: &'static str,
    alert_styles: &'static [AlertStyle],
    alert_container_classes: &'static str,
    alert_title_classes: &'static str,
    alert_body_classes: &'static str,
    alert_icon_size: u32,
    button_base_classes: &'static str,
    button_active_classes: &'static str,
    button_inactive_classes: &'static str,
    min_sidebar_width: u32,
    max_sidebar_width: u32,
    gfm: bool,
}

impl ClientConfig {
    fn new(options: &ExportOptions) -> Self {
        Self {
            tag_pattern: TAG_PATTERN_SOURCE,
            alert_styles: &ALERT_STYLES,
            alert_container_classes: ALERT_CONTAINER_CLASSES,
            alert_title_classes: ALERT_TITLE_CLASSES,
            alert_body_classes: ALERT_BODY_CLASSES,
            alert_icon_size: ALERT_ICON_SIZE,
            button_base_classes: BUTTON_BASE_CLASSES,
            button_active_classes: BUTTON_ACTIVE_CLASSES,
            button_inactive_classes: BUTTON_INACTIVE_CLASSES,
            min_sidebar_width: options.min_sidebar_width,
            max_sidebar_width: options.max_sidebar_width,
            gfm: options.gfm,
        }
    }

    /// JSON safe to embed in a `<script>` element.
    fn to_script_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace("</", r"<\/"))
    }
}

/// File name without its last extension.
///
/// Leading dots (`.env`) and dots in directory names are not extensions.
#[must_use]
pub fn display_name(file_name: &str) -> &str {
    let base_start = file_name.rfind('/').map_or(0, |i| i + 1);
    match file_name[base_start..].rfind('.') {
        Some(dot) if dot > 0 => &file_name[..base_start + dot],
        _ => file_name,
    }
}

/// Render an export document as one self-contained HTML page.
pub fn render_standalone(
    doc: &ExportDocument,
    options: &ExportOptions,
) -> Result<String, serde_json::Error> {
    let config = ClientConfig::new(options).to_script_json()?;
    let name = escape_html(display_name(&doc.file_name));

    let mut html = String::with_capacity(16384);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(html, "<title>{name} - DocFlow Export</title>");
    html.push_str(HEAD_ASSETS);
    html.push_str("<style>\n");
    html.push_str(PAGE_CSS);
    let _ = writeln!(
        html,
        ".sidebar {{ width: {}px; }}",
        options.sidebar_width
    );
    html.push_str(MARKDOWN_BODY_CSS);
    html.push_str("</style>\n</head>\n<body>\n");

    html.push_str("<div class=\"layout-container\">\n");
    render_sidebar(&mut html, &name, &doc.sections);
    html.push_str("<div class=\"resizer\"></div>\n");
    html.push_str("<main class=\"main-content custom-scrollbar\">\n");
    for (index, section) in doc.sections.iter().enumerate() {
        let prev = index.checked_sub(1).and_then(|i| doc.sections.get(i));
        let next = doc.sections.get(index + 1);
        render_section(&mut html, section, index == 0, prev, next, options);
    }
    html.push_str("</main>\n</div>\n");

    let _ = writeln!(
        html,
        "<script id=\"docflow-config\" type=\"application/json\">{config}</script>"
    );
    html.push_str("<script>\n");
    html.push_str(CLIENT_SCRIPT);
    html.push_str("</script>\n</body>\n</html>\n");
    Ok(html)
}

/// Render the sidebar with one button per section.
fn render_sidebar(html: &mut String, name: &str, sections: &[Section]) {
    html.push_str("<aside class=\"sidebar\">\n");
    html.push_str("<div class=\"p-4 border-b border-slate-800 bg-slate-900\">\n");
    let _ = writeln!(
        html,
        "<h1 class=\"font-bold text-xl tracking-tight leading-tight break-words text-slate-100\">{name}</h1>"
    );
    html.push_str("</div>\n");
    html.push_str("<nav class=\"flex-1 overflow-y-auto custom-scrollbar p-2\">\n");
    html.push_str("<ul class=\"space-y-0.5\">\n");
    for (index, section) in sections.iter().enumerate() {
        let state = if index == 0 {
            BUTTON_ACTIVE_CLASSES
        } else {
            BUTTON_INACTIVE_CLASSES
        };
        let id = escape_html(&section.id);
        let _ = writeln!(
            html,
            "<li><button onclick=\"switchSection('{id}')\" id=\"btn-{id}\" class=\"{BUTTON_BASE_CLASSES} {state}\"><span class=\"truncate\">{}</span></button></li>",
            escape_html(&section.title)
        );
    }
    html.push_str("</ul>\n</nav>\n</aside>\n");
}

/// Render one section container with its previous/next navigation.
fn render_section(
    html: &mut String,
    section: &Section,
    visible: bool,
    prev: Option<&Section>,
    next: Option<&Section>,
    options: &ExportOptions,
) {
    let hidden = if visible { "" } else { " hidden" };
    let _ = writeln!(
        html,
        "<div id=\"section-{}\" class=\"section-content{hidden}\">",
        escape_html(&section.id)
    );
    html.push_str("<header class=\"mb-8 pb-4\">\n");
    let _ = writeln!(
        html,
        "<h1 class=\"text-2xl md:text-3xl font-extrabold text-slate-100 tracking-tight leading-tight mb-6\">{}</h1>",
        escape_html(&section.title)
    );
    html.push_str("<div class=\"h-[1.5px] w-full rounded-full bg-gradient-to-r from-[#5ABDAC] to-transparent\"></div>\n");
    html.push_str("</header>\n");

    let _ = writeln!(html, "<div class=\"{PROSE_CLASSES}\">");
    if options.prerender {
        let result = MarkdownRenderer::<ThemedBackend>::new()
            .with_gfm(options.gfm)
            .render_markdown(&section.content);
        tracing::debug!(section = %section.id, alerts = result.alerts, "Prerendered section");
        html.push_str("<div class=\"markdown-rendered\">");
        html.push_str(&wrap_markdown_body(&result.html));
        html.push_str("</div>\n");
    } else {
        let _ = writeln!(
            html,
            "<div class=\"markdown-raw hidden\">{}</div>",
            escape_html(&section.content)
        );
        html.push_str("<div class=\"markdown-rendered\"></div>\n");
    }
    html.push_str("</div>\n");

    html.push_str("<div class=\"mt-24 grid grid-cols-1 md:grid-cols-2 gap-6 pt-10 border-t border-slate-800/60\">\n");
    html.push_str("<div class=\"flex justify-start\">\n");
    if let Some(prev) = prev {
        render_nav_button(html, prev, "Previous");
    }
    html.push_str("</div>\n<div class=\"flex justify-end\">\n");
    if let Some(next) = next {
        render_nav_button(html, next, "Next");
    }
    html.push_str("</div>\n</div>\n</div>\n");
}

fn render_nav_button(html: &mut String, target: &Section, label: &str) {
    let forward = label == "Next";
    let (align, text_align, chevron, nudge) = if forward {
        ("items-end", "text-right", CHEVRON_RIGHT, "group-hover:translate-x-1")
    } else {
        ("items-start", "text-left", CHEVRON_LEFT, "group-hover:-translate-x-1")
    };
    let icon = format!(
        "<svg class=\"w-5 h-5 flex-shrink-0 text-slate-500 group-hover:text-[#5ABDAC] transition-colors transform {nudge} duration-300\" fill=\"none\" viewBox=\"0 0 24 24\" stroke=\"currentColor\"><path stroke-linecap=\"round\" stroke-linejoin=\"round\" stroke-width=\"2\" d=\"{chevron}\" /></svg>"
    );
    let title = format!(
        "<span class=\"text-lg font-semibold truncate max-w-[200px] md:max-w-[300px]\">{}</span>",
        escape_html(&target.title)
    );

    let _ = write!(
        html,
        "<button onclick=\"switchSection('{}')\" class=\"{NAV_BUTTON_CLASSES} {align} {text_align}\">",
        escape_html(&target.id)
    );
    let _ = write!(
        html,
        "<span class=\"text-xs font-bold text-slate-500 uppercase tracking-widest mb-2 group-hover:text-[#5ABDAC] transition-colors\">{label}</span>"
    );
    html.push_str("<div class=\"flex items-center gap-3 text-slate-300 group-hover:text-white transition-colors w-full");
    if forward {
        let _ = write!(html, " justify-end\">{title}{icon}");
    } else {
        let _ = write!(html, "\">{icon}{title}");
    }
    html.push_str("</div></button>\n");
}

const HEAD_ASSETS: &str = r#"<script src="https://cdn.tailwindcss.com?plugins=typography"></script>
<script src="https://cdn.jsdelivr.net/npm/marked/marked.min.js"></script>
<link rel="stylesheet" href="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github-dark.min.css">
<script src="https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js"></script>
<script>
tailwind.config = {
  theme: {
    extend: {
      colors: { primary: '#0f172a', accent: '#5ABDAC' },
      fontFamily: { sans: ['Inter', 'sans-serif'] }
    }
  }
}
</script>
"#;

const PAGE_CSS: &str = r"@import url('https://fonts.googleapis.com/css2?family=Inter:wght@300;400;500;600;700&display=swap');
body { font-family: 'Inter', sans-serif; background-color: #020617; color: #f8fafc; margin: 0; padding: 0; }
.custom-scrollbar::-webkit-scrollbar { width: 6px; }
.custom-scrollbar::-webkit-scrollbar-track { background: transparent; }
.custom-scrollbar::-webkit-scrollbar-thumb { background-color: #334155; border-radius: 20px; }
.custom-scrollbar:hover::-webkit-scrollbar-thumb { background-color: #475569; }
.layout-container { display: flex; height: 100vh; overflow: hidden; width: 100%; }
.sidebar { background-color: #0f172a; display: flex; flex-direction: column; flex-shrink: 0; }
.main-content { flex: 1; overflow-y: auto; background-color: #020617; padding: 3rem; min-width: 0; scroll-behavior: smooth; }
.prose h2 { color: #5ABDAC !important; font-size: 1.35em !important; margin-top: 1.2em !important; margin-bottom: 0.5em !important; }
.prose h3 { color: #4A9E92 !important; font-size: 1.15em !important; margin-top: 1.0em !important; margin-bottom: 0.4em !important; }
.prose h4 { font-size: 1.0em !important; margin-top: 1.0em !important; margin-bottom: 0.4em !important; }
.prose strong, .prose b { color: #5ABDAC !important; font-weight: 700 !important; }
.prose a { color: #5ABDAC !important; text-decoration-color: rgba(90, 189, 172, 0.3) !important; }
.prose a:hover { color: #7CD4C6 !important; }
.prose blockquote { border-left-color: #5ABDAC !important; }
.prose code { color: #5ABDAC !important; }
.prose p { margin-bottom: 0.6em !important; margin-top: 0.6em !important; line-height: 1.7 !important; font-size: 0.95em !important; }
.prose ul, .prose ol { margin-bottom: 0.8em !important; margin-top: 0.4em !important; margin-left: 0.5rem !important; padding-left: 1.5rem !important; border-left: none !important; font-size: 0.95em !important; }
.prose li > ul, .prose li > ol { margin-top: 0.5em !important; margin-bottom: 0.5em !important; border-left: 1px solid #334155 !important; padding-left: 3rem !important; margin-left: -1.25rem !important; }
.prose li { margin-top: 0.2em !important; margin-bottom: 0.2em !important; line-height: 1.6 !important; padding-left: 0.5rem !important; }
.prose table { width: 100%; text-align: left; border-collapse: collapse; border-radius: 0.5rem; overflow: hidden; margin-bottom: 2em; border: 1px solid #334155; font-size: 0.9em; }
.prose thead th { background-color: #1e293b; color: #f1f5f9; font-weight: 600; padding: 0.75rem 1rem; border-bottom: 2px solid #334155; }
.prose tbody td { padding: 0.75rem 1rem; color: #cbd5e1; border-bottom: 1px solid #1e293b; vertical-align: top; white-space: pre-wrap; line-height: 1.6rem; }
.prose tbody td br { display: block; content: ' ' !important; margin-top: 2rem !important; margin-bottom: 0 !important; line-height: 0 !important; }
.prose tbody tr:last-child td { border-bottom: none; }
.prose tbody tr:nth-child(even) { background-color: #0f172a; }
.prose tbody tr:nth-child(odd) { background-color: rgba(30, 41, 59, 0.4); }
.resizer { width: 1px; background: #1e293b; cursor: col-resize; transition: background 0.2s, width 0.2s; flex-shrink: 0; z-index: 10; }
.resizer:hover, .resizer.resizing { background: #5ABDAC; width: 3px; }
@media (max-width: 768px) {
  .layout-container { flex-direction: column; }
  .sidebar { width: 100% !important; height: auto; max-height: 30vh; border-right: none; border-bottom: 1px solid #1e293b; }
  .main-content { padding: 1.5rem; }
  .resizer { display: none; }
}
";

/// Browser-side rendering, alert rewriting, navigation and resizing.
///
/// Alert tags are stripped by editing the first text node in place, so the
/// remaining text is never re-parsed as HTML. Raw HTML in the markdown is
/// rendered as text, as the server-side renderer does.
const CLIENT_SCRIPT: &str = r#"const config = JSON.parse(document.getElementById('docflow-config').textContent);
const tagPattern = new RegExp(config.tagPattern, 'i');
const alertStyles = {};
config.alertStyles.forEach(style => { alertStyles[style.kind] = style; });

function escapeHtml(value) {
  return value.replace(/&/g, '&amp;').replace(/</g, '&lt;').replace(/>/g, '&gt;')
    .replace(/"/g, '&quot;').replace(/'/g, '&#x27;');
}

function alertIcon(style) {
  const size = config.alertIconSize;
  return '<svg class="alert-icon" viewBox="0 0 16 16" width="' + size + '" height="' + size +
    '" fill="currentColor" aria-hidden="true"><path d="' + style.icon_path + '"></path></svg>';
}

function applyAlert(blockquote) {
  const first = blockquote.firstElementChild;
  if (!first || first.tagName !== 'P') return;
  const text = first.firstChild;
  if (!text || text.nodeType !== Node.TEXT_NODE) return;
  const match = tagPattern.exec(text.nodeValue);
  if (!match) return;
  const style = alertStyles[match[1].toUpperCase()];
  if (!style) return;

  text.nodeValue = text.nodeValue.slice(match[0].length).replace(/^\s+/, '');
  if (text.nodeValue === '' && text.nextSibling && text.nextSibling.nodeName === 'BR') {
    text.nextSibling.remove();
  }

  const container = document.createElement('div');
  container.className = config.alertContainerClasses + ' ' + style.classes;
  container.dataset.alertType = style.kind;
  const title = document.createElement('div');
  title.className = config.alertTitleClasses;
  title.innerHTML = alertIcon(style);
  const label = document.createElement('span');
  label.textContent = style.title;
  title.appendChild(label);
  const body = document.createElement('div');
  body.className = config.alertBodyClasses;
  while (blockquote.firstChild) body.appendChild(blockquote.firstChild);
  container.appendChild(title);
  container.appendChild(body);
  blockquote.replaceWith(container);
}

document.addEventListener('DOMContentLoaded', () => {
  marked.use({
    breaks: true,
    gfm: config.gfm,
    renderer: {
      html(token) { return escapeHtml(typeof token === 'string' ? token : token.text); }
    }
  });
  document.querySelectorAll('.markdown-raw').forEach(div => {
    const target = div.nextElementSibling;
    target.innerHTML = marked.parse(div.textContent);
    target.querySelectorAll('blockquote').forEach(applyAlert);
  });
  hljs.highlightAll();

  const resizer = document.querySelector('.resizer');
  const sidebar = document.querySelector('.sidebar');
  let isResizing = false;
  if (resizer && sidebar) {
    resizer.addEventListener('mousedown', e => {
      e.preventDefault();
      isResizing = true;
      resizer.classList.add('resizing');
      document.body.style.cursor = 'col-resize';
      document.body.style.userSelect = 'none';
    });
    document.addEventListener('mousemove', e => {
      if (!isResizing) return;
      const width = Math.min(Math.max(e.clientX, config.minSidebarWidth), config.maxSidebarWidth);
      sidebar.style.width = width + 'px';
    });
    document.addEventListener('mouseup', () => {
      if (!isResizing) return;
      isResizing = false;
      resizer.classList.remove('resizing');
      document.body.style.cursor = '';
      document.body.style.userSelect = '';
    });
  }
});

function switchSection(id) {
  document.querySelectorAll('.section-content').forEach(el => el.classList.add('hidden'));
  const target = document.getElementById('section-' + id);
  if (target) target.classList.remove('hidden');

  const main = document.querySelector('.main-content');
  if (main) main.scrollTop = 0;

  document.querySelectorAll('button[id^="btn-"]').forEach(btn => {
    btn.className = config.buttonBaseClasses + ' ' + config.buttonInactiveClasses;
  });
  const active = document.getElementById('btn-' + id);
  if (active) active.className = config.buttonBaseClasses + ' ' + config.buttonActiveClasses;
}
"#;
