//! Writing CSS variables into the project's global stylesheet.
//!
//! Each mode maps to one block: `light` to `:root`, `theme` to
//! `@theme inline`, and any other mode `m` to `.m`. Blocks are found at any
//! nesting depth, so a `:root` inside `@layer base { ... }` is updated where
//! it sits.

use regex::Regex;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{KitboxError, Result};
use crate::install::framework::ConfigOutcome;
use crate::registry::item::{CssVars, VariableSet};

const DEFAULT_INDENT: &str = "  ";

/// Selector of the block holding a mode's variables.
pub fn mode_selector(mode: &str) -> String {
    match mode {
        "light" => ":root".to_string(),
        "theme" => "@theme inline".to_string(),
        other => format!(".{}", other),
    }
}

/// Merge `vars` into the stylesheet text `css`.
///
/// Existing declarations are updated in place, new ones are appended to
/// their block, and missing blocks are appended to the end. Applying the
/// same variables twice changes nothing the second time.
pub fn update_stylesheet(css: &str, vars: &CssVars) -> std::result::Result<String, String> {
    let mut out = css.to_string();

    for (mode, set) in vars {
        if set.is_empty() {
            continue;
        }
        let selector = mode_selector(mode);
        let rules = scan_rules(&out)?;

        match rules.iter().find(|r| normalize(&r.selector) == selector) {
            Some(rule) => {
                let body = update_block(&out[rule.open + 1..rule.close], set)?;
                out = format!("{}{}{}", &out[..=rule.open], body, &out[rule.close..]);
            }
            None => {
                let trimmed = out.trim_end().len();
                out.truncate(trimmed);
                if !out.is_empty() {
                    out.push_str("\n\n");
                }
                out.push_str(&new_block(&selector, set));
            }
        }
    }

    Ok(out)
}

/// Merge `vars` into the stylesheet at `path`.
pub fn apply_css_vars(path: &Path, vars: &CssVars, dry_run: bool) -> Result<ConfigOutcome> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(e.into()),
    };

    let current = existing.as_deref().unwrap_or_default();
    let updated = update_stylesheet(current, vars).map_err(|message| KitboxError::ConfigMerge {
        path: path.to_path_buf(),
        message,
    })?;

    let outcome = match &existing {
        None => ConfigOutcome::Created,
        Some(content) if *content == updated => return Ok(ConfigOutcome::Unchanged),
        Some(_) => ConfigOutcome::Updated,
    };

    if !dry_run {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, updated)?;
        debug!("Updated {}", path.display());
    }

    Ok(outcome)
}

/// A `selector { ... }` block, with byte offsets of its braces.
#[derive(Debug, Clone, PartialEq)]
struct Rule {
    selector: String,
    open: usize,
    close: usize,
}

/// Copy of `css` with comments and string contents blanked to spaces.
///
/// Byte offsets are preserved, so positions found in the copy index the
/// original text.
fn mask_inert(css: &str) -> std::result::Result<String, String> {
    let bytes = css.as_bytes();
    let mut masked = bytes.to_vec();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                let end = css[i + 2..]
                    .find("*/")
                    .ok_or_else(|| "unterminated comment".to_string())?
                    + i
                    + 4;
                masked[i..end].fill(b' ');
                i = end;
                continue;
            }
            quote @ (b'"' | b'\'') => {
                let open = i;
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err("unterminated string".to_string());
                }
                masked[open + 1..i].fill(b' ');
            }
            _ => {}
        }
        i += 1;
    }

    String::from_utf8(masked).map_err(|e| e.to_string())
}

/// Find every block, skipping comments and strings.
fn scan_rules(css: &str) -> std::result::Result<Vec<Rule>, String> {
    let masked = mask_inert(css)?;
    let mut rules = Vec::new();
    let mut stack: Vec<(String, usize)> = Vec::new();
    let mut selector_start = 0;

    for (i, byte) in masked.bytes().enumerate() {
        match byte {
            b'{' => {
                stack.push((masked[selector_start..i].trim().to_string(), i));
                selector_start = i + 1;
            }
            b'}' => {
                let (selector, open) = stack
                    .pop()
                    .ok_or_else(|| format!("unexpected '}}' at byte {}", i))?;
                rules.push(Rule {
                    selector,
                    open,
                    close: i,
                });
                selector_start = i + 1;
            }
            b';' => selector_start = i + 1,
            _ => {}
        }
    }

    match stack.last() {
        Some((selector, _)) => Err(format!("unclosed block '{}'", selector)),
        None => Ok(rules),
    }
}

fn normalize(selector: &str) -> String {
    selector.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn update_block(body: &str, set: &VariableSet) -> std::result::Result<String, String> {
    let mut body = body.to_string();
    let mut missing = Vec::new();

    for (name, value) in set {
        let name = name.trim_start_matches("--");
        let pattern = format!(r"(^|[\s;{{])--{}\s*:\s*([^;{{}}]*)", regex::escape(name));
        let re = Regex::new(&pattern).map_err(|e| e.to_string())?;

        let masked = mask_inert(&body)?;
        let Some(found) = re.captures(&masked).and_then(|c| c.get(2)) else {
            missing.push((name, value));
            continue;
        };

        let start = found.start();
        let end = start + found.as_str().trim_end().len();
        let terminated = masked[found.end()..].starts_with(';');
        if &body[start..end] == value.as_str() && terminated {
            continue;
        }

        let replacement = if terminated {
            value.clone()
        } else {
            format!("{};", value)
        };
        body.replace_range(start..end, &replacement);
    }

    if missing.is_empty() {
        return Ok(body);
    }

    let indent = detect_indent(&body);
    let last = mask_inert(&body)?.trim_end().chars().last();
    let content_end = body.trim_end().len();
    let tail = body[content_end..].to_string();
    body.truncate(content_end);

    if last.is_some_and(|c| c != ';' && c != '{' && c != '}') {
        body.push(';');
    }
    for (name, value) in missing {
        body.push_str(&format!("\n{}--{}: {};", indent, name, value));
    }
    if tail.contains('\n') {
        body.push_str(&tail);
    } else {
        body.push('\n');
    }

    Ok(body)
}

/// Indentation of the first declaration line in a block body.
fn detect_indent(body: &str) -> String {
    body.lines()
        .skip(1)
        .find(|line| !line.trim().is_empty())
        .map(|line| {
            line.chars()
                .take_while(|c| c.is_whitespace())
                .collect::<String>()
        })
        .filter(|indent| !indent.is_empty())
        .unwrap_or_else(|| DEFAULT_INDENT.to_string())
}

fn new_block(selector: &str, set: &VariableSet) -> String {
    let mut block = format!("{} {{\n", selector);
    for (name, value) in set {
        block.push_str(&format!(
            "{}--{}: {};\n",
            DEFAULT_INDENT,
            name.trim_start_matches("--"),
            value
        ));
    }
    block.push_str("}\n");
    block
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn vars(modes: &[(&str, &[(&str, &str)])]) -> CssVars {
        modes
            .iter()
            .map(|(mode, pairs)| {
                (
                    mode.to_string(),
                    pairs
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                )
            })
            .collect()
    }

    const GLOBALS: &str = "@tailwind base;

@layer base {
  :root {
    --background: 0 0% 100%;
    --radius: 0.5rem;
  }

  .dark {
    --background: 0 0% 3.9%;
  }
}
";

    #[test]
    fn mode_selectors() {
        assert_eq!(mode_selector("light"), ":root");
        assert_eq!(mode_selector("dark"), ".dark");
        assert_eq!(mode_selector("theme"), "@theme inline");
        assert_eq!(mode_selector("contrast"), ".contrast");
    }

    #[test]
    fn updates_and_appends_in_nested_blocks() {
        let updated = update_stylesheet(
            GLOBALS,
            &vars(&[
                ("light", &[("radius", "0.75rem"), ("card", "0 0% 100%")]),
                ("dark", &[("card", "0 0% 3.9%")]),
            ]),
        )
        .unwrap();

        assert_eq!(
            updated,
            "@tailwind base;

@layer base {
  :root {
    --background: 0 0% 100%;
    --radius: 0.75rem;
    --card: 0 0% 100%;
  }

  .dark {
    --background: 0 0% 3.9%;
    --card: 0 0% 3.9%;
  }
}
"
        );
    }

    #[test]
    fn commented_out_declaration_is_not_updated() {
        let css = ":root {\n  /* --radius: 0.25rem; */\n  --radius: 0.5rem;\n}\n";

        let updated = update_stylesheet(css, &vars(&[("light", &[("radius", "1rem")])])).unwrap();

        assert_eq!(
            updated,
            ":root {\n  /* --radius: 0.25rem; */\n  --radius: 1rem;\n}\n"
        );
    }

    #[test]
    fn declaration_only_in_a_comment_is_appended() {
        let css = ":root {\n  --background: 0 0% 100%;\n  /* --ring: 0 0% 0%; */\n}\n";

        let updated = update_stylesheet(css, &vars(&[("light", &[("ring", "0 0% 3.9%")])])).unwrap();

        assert_eq!(
            updated,
            ":root {\n  --background: 0 0% 100%;\n  /* --ring: 0 0% 0%; */\n  --ring: 0 0% 3.9%;\n}\n"
        );
    }

    #[test]
    fn update_is_idempotent() {
        let v = vars(&[
            ("light", &[("card", "0 0% 100%")]),
            ("dark", &[("card", "0 0% 3.9%")]),
            ("theme", &[("color-card", "var(--card)")]),
        ]);

        let once = update_stylesheet(GLOBALS, &v).unwrap();
        let twice = update_stylesheet(&once, &v).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn missing_blocks_are_appended() {
        let updated =
            update_stylesheet("body {\n  margin: 0;\n}\n", &vars(&[("dark", &[("--ring", "0 0% 83%")])]))
                .unwrap();

        assert_eq!(
            updated,
            "body {\n  margin: 0;\n}\n\n.dark {\n  --ring: 0 0% 83%;\n}\n"
        );
    }

    #[test]
    fn similar_names_are_not_confused() {
        let css = ":root {\n  --card-foreground: 0 0% 4%;\n}\n";
        let updated = update_stylesheet(css, &vars(&[("light", &[("card", "0 0% 100%")])])).unwrap();

        assert_eq!(
            updated,
            ":root {\n  --card-foreground: 0 0% 4%;\n  --card: 0 0% 100%;\n}\n"
        );
    }

    #[test]
    fn unterminated_last_declaration_is_fixed() {
        let updated = update_stylesheet(
            ":root { --radius: 0.5rem }",
            &vars(&[("light", &[("radius", "1rem")])]),
        )
        .unwrap();
        assert_eq!(updated, ":root { --radius: 1rem; }");
    }

    #[test]
    fn braces_in_comments_and_strings_are_ignored() {
        let css = "/* { */\n:root {\n  --font: \"a}b\";\n}\n";
        let updated = update_stylesheet(css, &vars(&[("light", &[("radius", "1rem")])])).unwrap();
        assert!(updated.contains("  --radius: 1rem;\n}"));
        assert!(updated.starts_with("/* { */"));
    }

    #[test]
    fn unbalanced_braces_fail() {
        let light = vars(&[("light", &[("radius", "1rem")])]);
        assert!(update_stylesheet(":root {\n  --a: 1;\n", &light).is_err());
        assert!(update_stylesheet("}\n", &light).is_err());
    }

    #[test]
    fn apply_creates_and_reports_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("src/styles/globals.css");
        let v = vars(&[("light", &[("radius", "0.5rem")])]);

        assert_eq!(apply_css_vars(&path, &v, false).unwrap(), ConfigOutcome::Created);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            ":root {\n  --radius: 0.5rem;\n}\n"
        );
        assert_eq!(apply_css_vars(&path, &v, false).unwrap(), ConfigOutcome::Unchanged);
    }

    #[test]
    fn apply_leaves_malformed_file_alone() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("globals.css");
        fs::write(&path, ":root {").unwrap();

        let err = apply_css_vars(&path, &vars(&[("light", &[("a", "1")])]), false).unwrap_err();

        assert!(matches!(err, KitboxError::ConfigMerge { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), ":root {");
    }

    #[test]
    fn apply_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("globals.css");
        fs::write(&path, GLOBALS).unwrap();

        let outcome =
            apply_css_vars(&path, &vars(&[("light", &[("radius", "1rem")])]), true).unwrap();

        assert_eq!(outcome, ConfigOutcome::Updated);
        assert_eq!(fs::read_to_string(&path).unwrap(), GLOBALS);
    }
}
