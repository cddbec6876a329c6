//! JavaScript evaluated inside the page.
//!
//! Every script starts with a `/* pagehand:<name> */` tag so traffic logs and
//! scripted test drivers can tell them apart.

use serde::Serialize;

use crate::driver::{Locator, Rect};

/// Installs `window.__pagehand` once per document.
const LOCATOR_LIBRARY: &str = r##"(() => {
  if (window.__pagehand) return;
  const norm = (s) => (s || '').replace(/\s+/g, ' ').trim().toLowerCase();
  const INPUT_ROLES = {
    button: 'button', submit: 'button', reset: 'button', image: 'button',
    checkbox: 'checkbox', radio: 'radio', range: 'slider', number: 'spinbutton',
    search: 'searchbox',
  };
  const implicitRole = (el) => {
    const explicit = el.getAttribute('role');
    if (explicit) return explicit.split(/\s+/)[0].toLowerCase();
    const tag = el.tagName.toLowerCase();
    if (tag === 'input') {
      const type = (el.getAttribute('type') || 'text').toLowerCase();
      if (type === 'hidden') return null;
      if (el.hasAttribute('list')) return 'combobox';
      return INPUT_ROLES[type] || 'textbox';
    }
    if (tag === 'a') return el.hasAttribute('href') ? 'link' : null;
    if (tag === 'button' || tag === 'summary') return 'button';
    if (tag === 'select') return (el.multiple || el.size > 1) ? 'listbox' : 'combobox';
    if (tag === 'textarea') return 'textbox';
    if (tag === 'option') return 'option';
    if (el.isContentEditable && (!el.parentElement || !el.parentElement.isContentEditable)) return 'textbox';
    return null;
  };
  const labelText = (el) => {
    const parts = [];
    const by = el.getAttribute('aria-labelledby');
    if (by) {
      for (const id of by.split(/\s+/)) {
        const target = document.getElementById(id);
        if (target) parts.push(target.innerText || target.textContent);
      }
    }
    if (el.labels) for (const l of el.labels) parts.push(l.innerText || l.textContent);
    return parts.join(' ');
  };
  const accessibleName = (el) => {
    const aria = el.getAttribute('aria-label');
    if (aria && aria.trim()) return aria;
    const label = labelText(el);
    if (label.trim()) return label;
    const tag = el.tagName.toLowerCase();
    if (tag === 'input' || tag === 'textarea' || tag === 'select') {
      const type = (el.getAttribute('type') || '').toLowerCase();
      if (['button', 'submit', 'reset'].includes(type)) return el.value || '';
      return el.getAttribute('placeholder') || el.getAttribute('title') || '';
    }
    if (tag === 'img') return el.getAttribute('alt') || '';
    return el.innerText || el.textContent || el.getAttribute('title') || '';
  };
  const isVisible = (el) => {
    const r = el.getBoundingClientRect();
    if (r.width <= 0 || r.height <= 0) return false;
    const s = getComputedStyle(el);
    return s.visibility !== 'hidden' && s.display !== 'none';
  };
  const ownText = (el) => norm(el.innerText || el.value || el.textContent);
  const isField = (el) =>
    ['INPUT', 'TEXTAREA', 'SELECT'].includes(el.tagName) || el.isContentEditable ||
    ['textbox', 'searchbox', 'combobox', 'spinbutton', 'listbox'].includes(el.getAttribute('role'));
  const queryAll = (loc) => {
    const all = () => Array.from(document.querySelectorAll('body *'));
    switch (loc.kind) {
      case 'role': {
        const name = norm(loc.name);
        return all().filter((el) => implicitRole(el) === loc.role &&
          (!name || norm(accessibleName(el)).includes(name)));
      }
      case 'text': {
        const text = norm(loc.text);
        return all().filter((el) => ownText(el).includes(text) &&
          !Array.from(el.children).some((c) => ownText(c).includes(text)));
      }
      case 'label': {
        const text = norm(loc.text);
        return all().filter((el) => isField(el) &&
          norm(labelText(el) || el.getAttribute('aria-label')).includes(text));
      }
      case 'css': {
        let els;
        try { els = Array.from(document.querySelectorAll(loc.selector)); } catch (e) { return []; }
        if (loc.hasText) {
          const text = norm(loc.hasText);
          els = els.filter((el) => ownText(el).includes(text));
        }
        return els;
      }
      case 'point': {
        const el = document.elementFromPoint(loc.x, loc.y);
        return el ? [el] : [];
      }
    }
    return [];
  };
  const element = (loc) => queryAll(loc).find(isVisible) || null;
  const rectOf = (el) => {
    const r = el.getBoundingClientRect();
    return { x: r.x, y: r.y, width: r.width, height: r.height };
  };
  const setValue = (el, value) => {
    const proto = el.tagName === 'TEXTAREA' ? HTMLTextAreaElement.prototype
      : el.tagName === 'SELECT' ? HTMLSelectElement.prototype : HTMLInputElement.prototype;
    const desc = Object.getOwnPropertyDescriptor(proto, 'value');
    if (desc && desc.set) desc.set.call(el, value); else el.value = value;
  };
  const fire = (el, ...types) => {
    for (const t of types) el.dispatchEvent(new Event(t, { bubbles: true }));
  };
  window.__pagehand = {
    norm, implicitRole, accessibleName, isVisible, element, rectOf, setValue, fire,
    count(loc) {
      return queryAll(loc).length;
    },
    locate(loc, scroll) {
      const el = element(loc);
      if (!el) return null;
      if (scroll) el.scrollIntoView({ block: 'center', inline: 'center' });
      return rectOf(el);
    },
    fill(loc, text) {
      const el = element(loc);
      if (!el) return false;
      el.scrollIntoView({ block: 'center' });
      el.focus();
      if (el.isContentEditable) el.textContent = text; else setValue(el, text);
      fire(el, 'input', 'change');
      return true;
    },
    selectOption(loc, label) {
      const el = element(loc);
      if (!el || el.tagName !== 'SELECT') return null;
      const want = norm(label);
      const options = Array.from(el.options);
      const opt = options.find((o) => norm(o.label || o.text) === want) ||
        options.find((o) => norm(o.label || o.text).includes(want));
      if (!opt) return null;
      setValue(el, opt.value);
      fire(el, 'input', 'change');
      return opt.value;
    },
  };
})();"##;

fn tagged(name: &str, body: &str) -> String {
    format!("/* pagehand:{} */\n{}", name, body)
}

fn with_library(name: &str, call: &str) -> String {
    tagged(name, &format!("{}\n{}", LOCATOR_LIBRARY, call))
}

fn js<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Name of a tagged script, if it carries a tag.
#[cfg(test)]
pub(crate) fn tag_of(script: &str) -> Option<&str> {
    let rest = script.strip_prefix("/* pagehand:")?;
    rest.split_once(" */").map(|(name, _)| name)
}

pub(crate) fn count(locator: &Locator) -> String {
    with_library("count", &format!("window.__pagehand.count({})", js(locator)))
}

pub(crate) fn locate(locator: &Locator, scroll: bool) -> String {
    with_library(
        "locate",
        &format!("window.__pagehand.locate({}, {})", js(locator), scroll),
    )
}

pub(crate) fn fill(locator: &Locator, text: &str) -> String {
    with_library(
        "fill",
        &format!("window.__pagehand.fill({}, {})", js(locator), js(text)),
    )
}

pub(crate) fn select_option(locator: &Locator, label: &str) -> String {
    with_library(
        "select_option",
        &format!("window.__pagehand.selectOption({}, {})", js(locator), js(label)),
    )
}

pub(crate) fn viewport() -> String {
    tagged(
        "viewport",
        "({ width: window.innerWidth, height: window.innerHeight })",
    )
}

pub(crate) fn location() -> String {
    tagged("location", "window.location.href")
}

pub(crate) fn title() -> String {
    tagged("title", "document.title")
}

pub(crate) fn ready_state() -> String {
    tagged("ready_state", "document.readyState")
}

pub(crate) fn body_present() -> String {
    tagged("body_present", "!!document.body")
}

/// Counts child-list mutations under `<body>` during `window_ms`.
pub(crate) fn mutation_sample(window_ms: u64) -> String {
    tagged(
        "mutation_sample",
        &format!(
            r#"new Promise((resolve) => {{
  let count = 0;
  const observer = new MutationObserver((records) => {{ count += records.length; }});
  observer.observe(document.body || document.documentElement, {{ childList: true, subtree: true }});
  setTimeout(() => {{ observer.disconnect(); resolve(count); }}, {});
}})"#,
            window_ms
        ),
    )
}

/// Candidate widgets found by walking the DOM rather than the accessibility
/// tree. Each entry: `{role, name, rect, tag, inputType}`.
pub(crate) fn dom_scan() -> String {
    with_library(
        "dom_scan",
        r#"(() => {
  const ph = window.__pagehand;
  const SELECTOR = [
    'input', 'textarea', 'select', '[contenteditable=""]', '[contenteditable="true"]',
    '[role="button"]', '[role="link"]', '[role="checkbox"]', '[role="radio"]', '[role="switch"]',
    '[role="tab"]', '[role="option"]', '[role="menuitem"]', '[role="treeitem"]',
    '[role="textbox"]', '[role="searchbox"]', '[role="combobox"]', '[role="spinbutton"]',
    '[role="listbox"]', '[role="menu"]',
  ].join(',');
  const CONTAINERS = '[role="listitem"], [role="group"], [role="radiogroup"], fieldset, [data-params], .form-group, .question';
  const nearbyText = (el) => {
    const container = el.closest(CONTAINERS);
    if (container) {
      const heading = container.querySelector('[role="heading"], legend, h1, h2, h3, h4, h5, h6, label');
      if (heading && heading !== el) {
        const text = (heading.innerText || heading.textContent || '').trim();
        if (text) return text;
      }
    }
    const prev = el.previousElementSibling;
    if (prev && ['LABEL', 'SPAN', 'DIV', 'P'].includes(prev.tagName)) {
      return (prev.innerText || '').trim();
    }
    return '';
  };
  const nameOf = (el) => {
    const aria = el.getAttribute('aria-label');
    if (aria && aria.trim()) return aria.trim();
    const placeholder = el.getAttribute('placeholder');
    if (placeholder && placeholder.trim()) return placeholder.trim();
    const own = ph.accessibleName(el).replace(/\s+/g, ' ').trim();
    if (own && !['INPUT', 'TEXTAREA', 'SELECT'].includes(el.tagName)) return own;
    return nearbyText(el) || own;
  };
  const out = [];
  for (const el of document.querySelectorAll(SELECTOR)) {
    const role = ph.implicitRole(el);
    if (!role || !ph.isVisible(el)) continue;
    out.push({
      role,
      name: nameOf(el).slice(0, 200),
      rect: ph.rectOf(el),
      tag: el.tagName.toLowerCase(),
      inputType: el.getAttribute('type') || '',
    });
  }
  return out;
})()"#,
    )
}

/// One isolated element-state read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Probe {
    Checked,
    AriaChecked,
    Value,
    Disabled,
}

impl Probe {
    fn tag(self) -> &'static str {
        match self {
            Probe::Checked => "probe_checked",
            Probe::AriaChecked => "probe_aria_checked",
            Probe::Value => "probe_value",
            Probe::Disabled => "probe_disabled",
        }
    }

    fn body(self) -> &'static str {
        match self {
            Probe::Checked => {
                r#"if (el.tagName === 'INPUT' && ['checkbox', 'radio'].includes(el.type)) return el.checked;
  const aria = el.getAttribute('aria-checked');
  if (aria !== null) return aria === 'true';
  const inner = el.querySelector('input[type="checkbox"], input[type="radio"]');
  if (inner) return inner.checked;
  throw new Error('Not a checkbox or radio button');"#
            }
            Probe::AriaChecked => "return el.getAttribute('aria-checked');",
            Probe::Value => {
                r#"if ('value' in el && typeof el.value === 'string') return el.value;
  if (el.isContentEditable) return el.innerText;
  throw new Error('Element has no value');"#
            }
            Probe::Disabled => {
                "return el.disabled === true || el.getAttribute('aria-disabled') === 'true';"
            }
        }
    }
}

pub(crate) fn element_probe(probe: Probe, locator: &Locator) -> String {
    with_library(
        probe.tag(),
        &format!(
            "(() => {{\n  const el = window.__pagehand.element({});\n  if (!el) throw new Error('element not found');\n  {}\n}})()",
            js(locator),
            probe.body()
        ),
    )
}

/// Non-empty value of a field within `radius` of `rect`, or of the focused
/// element when no rect is known.
pub(crate) fn value_near(rect: Option<&Rect>, radius: f64) -> String {
    tagged(
        "value_near",
        &format!(
            r#"(() => {{
  const target = {};
  const radius = {};
  const read = (el) => el.isContentEditable ? el.innerText : (typeof el.value === 'string' ? el.value : '');
  if (!target) {{
    const active = document.activeElement;
    return active ? read(active) : null;
  }}
  const fields = document.querySelectorAll('input, textarea, select, [contenteditable=""], [contenteditable="true"]');
  for (const f of fields) {{
    const r = f.getBoundingClientRect();
    if (Math.abs(r.x - target.x) <= radius && Math.abs(r.y - target.y) <= radius) {{
      const value = read(f);
      if (value && value.trim()) return value;
    }}
  }}
  return null;
}})()"#,
            js(&rect),
            radius
        ),
    )
}

/// Assign an ISO date to the native date input nearest `rect`.
pub(crate) fn set_date_value(rect: &Rect, radius: f64, iso: &str) -> String {
    with_library(
        "set_date_value",
        &format!(
            r#"(() => {{
  const ph = window.__pagehand;
  const target = {};
  const radius = {};
  for (const el of document.querySelectorAll('input[type="date"]')) {{
    const r = el.getBoundingClientRect();
    if (Math.abs(r.x - target.x) <= radius && Math.abs(r.y - target.y) <= radius) {{
      el.focus();
      ph.setValue(el, {});
      ph.fire(el, 'input', 'change', 'blur');
      return true;
    }}
  }}
  return false;
}})()"#,
            js(rect),
            radius,
            js(iso)
        ),
    )
}

/// Pick an option by label in the native `<select>` nearest `rect`.
/// Returns the selected value, or null when no select or option matched.
pub(crate) fn select_near(rect: &Rect, radius: f64, label: &str) -> String {
    with_library(
        "select_near",
        &format!(
            r#"(() => {{
  const ph = window.__pagehand;
  const target = {};
  const radius = {};
  const want = ph.norm({});
  for (const el of document.querySelectorAll('select')) {{
    const r = el.getBoundingClientRect();
    if (Math.abs(r.x - target.x) > radius || Math.abs(r.y - target.y) > radius) continue;
    const options = Array.from(el.options);
    const opt = options.find((o) => ph.norm(o.label || o.text) === want) ||
      options.find((o) => ph.norm(o.label || o.text).includes(want));
    if (!opt) return null;
    ph.setValue(el, opt.value);
    ph.fire(el, 'input', 'change');
    return opt.value;
  }}
  return null;
}})()"#,
            js(rect),
            radius,
            js(label)
        ),
    )
}

/// Fill separate month/day/year controls matched by the words of their
/// name, id, aria-label or placeholder.
pub(crate) fn date_parts(year: i32, month: u32, day: u32) -> String {
    with_library(
        "date_parts",
        &format!(
            r#"(() => {{
  const ph = window.__pagehand;
  const controls = Array.from(document.querySelectorAll('input, select')).filter(ph.isVisible);
  const words = (el) => [el.name, el.id, el.getAttribute('aria-label'), el.getAttribute('placeholder')]
    .filter(Boolean).join(' ')
    .replace(/([a-z])([A-Z])/g, '$1 $2')
    .toLowerCase().split(/[^a-z0-9]+/).filter(Boolean);
  // Word names match inside a word ("birthMonth"), letter codes only whole.
  const matches = (c, [word, codes]) =>
    words(c).some((w) => w.includes(word) || codes.includes(w));
  const assign = (needles, padded, plain) => {{
    const el = controls.find((c) => matches(c, needles));
    if (!el) return false;
    if (el.tagName === 'SELECT') {{
      const opt = Array.from(el.options).find((o) => [padded, plain].includes(o.value) || [padded, plain].includes(o.text.trim()));
      if (!opt) return false;
      ph.setValue(el, opt.value);
    }} else {{
      ph.setValue(el, padded);
    }}
    ph.fire(el, 'input', 'change', 'blur');
    return true;
  }};
  const m = assign(['month', ['mm']], {month:?}, {month_plain:?});
  const d = assign(['day', ['dd']], {day:?}, {day_plain:?});
  const y = assign(['year', ['yyyy', 'yy']], {year:?}, {year:?});
  return m && d && y;
}})()"#,
            month = format!("{:02}", month),
            month_plain = month.to_string(),
            day = format!("{:02}", day),
            day_plain = day.to_string(),
            year = year.to_string(),
        ),
    )
}

/// Visible error messages: known error selectors plus small reddish text
/// mentioning required/invalid/error.
pub(crate) fn form_errors() -> String {
    tagged(
        "form_errors",
        r#"(() => {
  const SELECTORS = [
    '[role="alert"]', '[aria-live="assertive"]', '.error', '.error-message', '.errors',
    '.field-error', '.form-error', '.invalid-feedback', '.validation-error',
    '.help-block.error', '[class*="errorMessage"]', '[class*="error-text"]',
  ];
  const visible = (el) => {
    const r = el.getBoundingClientRect();
    const s = getComputedStyle(el);
    return r.width > 0 && r.height > 0 && s.visibility !== 'hidden' && s.display !== 'none';
  };
  const out = [];
  for (const sel of SELECTORS) {
    for (const el of document.querySelectorAll(sel)) {
      if (!visible(el)) continue;
      const text = (el.innerText || '').trim();
      if (text) out.push(text);
    }
  }
  const KEYWORDS = /required|invalid|error/i;
  for (const el of document.querySelectorAll('span, div, p, small, label')) {
    if (el.children.length > 2 || !visible(el)) continue;
    const text = (el.innerText || '').trim();
    if (!text || text.length > 200 || !KEYWORDS.test(text)) continue;
    if (el.getBoundingClientRect().height > 60) continue;
    const m = getComputedStyle(el).color.match(/rgba?\((\d+),\s*(\d+),\s*(\d+)/);
    if (!m) continue;
    const [r, g, b] = [Number(m[1]), Number(m[2]), Number(m[3])];
    if (r > 150 && g < 100 && b < 100) out.push(text);
  }
  return out;
})()"#,
    )
}

pub(crate) fn page_text() -> String {
    tagged(
        "page_text",
        "({ text: document.body ? document.body.innerText : '', title: document.title, url: window.location.href })",
    )
}

/// Scroll vertically by `fraction` of the viewport height. Negative scrolls up.
pub(crate) fn scroll_by(fraction: f64) -> String {
    tagged(
        "scroll",
        &format!(
            "(() => {{ window.scrollBy(0, window.innerHeight * {}); return window.scrollY; }})()",
            fraction
        ),
    )
}

pub(crate) fn load_status() -> String {
    tagged(
        "load_status",
        "({ readyState: document.readyState, isDOMContentLoaded: document.readyState !== 'loading', isPageComplete: document.readyState === 'complete' })",
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_of() {
        assert_eq!(tag_of(&dom_scan()), Some("dom_scan"));
        assert_eq!(tag_of(&scroll_by(0.8)), Some("scroll"));
        assert_eq!(tag_of("document.title"), None);
    }

    #[test]
    fn test_locator_is_embedded_as_json() {
        let script = locate(&Locator::role("button", "Say \"hi\""), true);
        assert!(script.contains(r#""kind":"role""#));
        assert!(script.contains(r#"Say \"hi\""#));
        assert!(script.ends_with(", true)"));
    }

    #[test]
    fn test_probe_tags_are_distinct() {
        let loc = Locator::point(1.0, 2.0);
        let tags: Vec<_> = [Probe::Checked, Probe::AriaChecked, Probe::Value, Probe::Disabled]
            .iter()
            .map(|p| tag_of(&element_probe(*p, &loc)).unwrap().to_string())
            .collect();
        assert_eq!(
            tags,
            vec!["probe_checked", "probe_aria_checked", "probe_value", "probe_disabled"]
        );
    }

    #[test]
    fn test_value_near_without_rect_reads_focus() {
        let script = value_near(None, 20.0);
        assert!(script.contains("const target = null;"));
    }

    #[test]
    fn test_date_parts_pads_values() {
        let script = date_parts(2024, 1, 5);
        assert!(script.contains(r#""01""#));
        assert!(script.contains(r#""5""#));
        assert!(script.contains(r#""2024""#));
    }

    #[test]
    fn test_date_parts_letter_codes_match_whole_words() {
        let script = date_parts(2024, 1, 5);
        assert!(script.contains("assign(['month', ['mm']]"));
        assert!(script.contains("assign(['day', ['dd']]"));
        assert!(script.contains("assign(['year', ['yyyy', 'yy']]"));
        assert!(script.contains("codes.includes(w)"));
        assert!(!script.contains("key(c).includes(n)"));
    }

    #[test]
    fn test_select_near_embeds_label_and_position() {
        let script = select_near(&Rect::new(10.0, 20.0, 30.0, 40.0), 20.0, "Côte d'Ivoire");
        assert_eq!(tag_of(&script), Some("select_near"));
        assert!(script.contains(r#""x":10.0"#));
        assert!(script.contains(r#""Côte d'Ivoire""#));
    }

    #[test]
    fn test_count_uses_query_all() {
        let script = count(&Locator::text("Logo"));
        assert_eq!(tag_of(&script), Some("count"));
        assert!(script.contains("window.__pagehand.count("));
    }
}
