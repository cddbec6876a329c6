//! Key definitions for `Input.dispatchKeyEvent`.

/// Everything Chrome needs to synthesize one key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDefinition {
    pub key: String,
    pub code: String,
    pub key_code: i64,
    /// Text inserted by the key, if any.
    pub text: Option<String>,
}

/// Parsed `Modifier+Key` chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyChord {
    pub modifiers: i64,
    pub key: KeyDefinition,
}

impl KeyChord {
    /// Parse `"Enter"`, `"Control+a"`, `"Shift+Tab"` and similar.
    ///
    /// A trailing `+` is the plus key itself (`"Control++"`).
    pub fn parse(combo: &str) -> Self {
        let (modifier_part, key_part) = match combo.strip_suffix("++") {
            Some(rest) => (rest, "+"),
            None => match combo.rfind('+') {
                Some(idx) if idx + 1 < combo.len() => (&combo[..idx], &combo[idx + 1..]),
                _ => ("", combo),
            },
        };

        let modifier_names: Vec<&str> = modifier_part.split('+').filter(|m| !m.is_empty()).collect();
        let modifiers = modifier_flags(&modifier_names);
        let mut key = key_definition(key_part);
        // Chords with Control/Alt/Meta insert no text.
        if modifiers & !SHIFT != 0 {
            key.text = None;
        }

        Self { modifiers, key }
    }
}

const SHIFT: i64 = 8;

/// Modifier bit flags from modifier names.
pub fn modifier_flags(modifiers: &[&str]) -> i64 {
    let mut flags = 0;
    for m in modifiers {
        match m.to_lowercase().as_str() {
            "alt" => flags |= 1,
            "control" | "ctrl" => flags |= 2,
            "meta" | "command" | "cmd" => flags |= 4,
            "shift" => flags |= SHIFT,
            _ => {}
        }
    }
    flags
}

/// Definition for a named key or a single character.
pub fn key_definition(key: &str) -> KeyDefinition {
    let named = |code: &str, key_code: i64, text: Option<&str>| KeyDefinition {
        key: key.to_string(),
        code: code.to_string(),
        key_code,
        text: text.map(str::to_string),
    };

    match key {
        "Enter" => named("Enter", 13, Some("\r")),
        "Tab" => named("Tab", 9, None),
        "Escape" => named("Escape", 27, None),
        "Backspace" => named("Backspace", 8, None),
        "Delete" => named("Delete", 46, None),
        "ArrowUp" => named("ArrowUp", 38, None),
        "ArrowDown" => named("ArrowDown", 40, None),
        "ArrowLeft" => named("ArrowLeft", 37, None),
        "ArrowRight" => named("ArrowRight", 39, None),
        "Home" => named("Home", 36, None),
        "End" => named("End", 35, None),
        "PageUp" => named("PageUp", 33, None),
        "PageDown" => named("PageDown", 34, None),
        " " | "Space" => KeyDefinition {
            key: " ".to_string(),
            code: "Space".to_string(),
            key_code: 32,
            text: Some(" ".to_string()),
        },
        _ => {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => char_definition(c),
                _ => named(key, 0, None),
            }
        }
    }
}

fn char_definition(c: char) -> KeyDefinition {
    let (code, key_code) = if c.is_ascii_alphabetic() {
        let upper = c.to_ascii_uppercase();
        (format!("Key{}", upper), upper as i64)
    } else if c.is_ascii_digit() {
        (format!("Digit{}", c), c as i64)
    } else {
        (String::new(), 0)
    };

    KeyDefinition {
        key: c.to_string(),
        code,
        key_code,
        text: Some(c.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_flags() {
        assert_eq!(modifier_flags(&["Control"]), 2);
        assert_eq!(modifier_flags(&["ctrl", "Shift"]), 10);
        assert_eq!(modifier_flags(&["Meta", "Alt"]), 5);
        assert_eq!(modifier_flags(&["Hyper"]), 0);
    }

    #[test]
    fn test_parse_plain_key() {
        let chord = KeyChord::parse("Enter");
        assert_eq!(chord.modifiers, 0);
        assert_eq!(chord.key.key_code, 13);
        assert_eq!(chord.key.text.as_deref(), Some("\r"));
    }

    #[test]
    fn test_parse_combo_strips_text() {
        let chord = KeyChord::parse("Control+a");
        assert_eq!(chord.modifiers, 2);
        assert_eq!(chord.key.code, "KeyA");
        assert_eq!(chord.key.key_code, 65);
        assert!(chord.key.text.is_none());
    }

    #[test]
    fn test_parse_shift_keeps_text() {
        let chord = KeyChord::parse("Shift+Tab");
        assert_eq!(chord.modifiers, 8);
        assert_eq!(chord.key.code, "Tab");
    }

    #[test]
    fn test_parse_plus_key() {
        let chord = KeyChord::parse("Control++");
        assert_eq!(chord.modifiers, 2);
        assert_eq!(chord.key.key, "+");

        let chord = KeyChord::parse("+");
        assert_eq!(chord.modifiers, 0);
        assert_eq!(chord.key.key, "+");
    }

    #[test]
    fn test_digit_definition() {
        let def = key_definition("7");
        assert_eq!(def.code, "Digit7");
        assert_eq!(def.key_code, 55);
    }
}
