//! Crosshair share-code decoder
//!
//! Codes look like `0;P;c;5;h;0;0l;4;0o;2;0a;1;1b;0`: a `0;` header, then
//! `;`-separated key/value tokens. `P` opens the primary crosshair section,
//! `A` and `S` open other profiles which are skipped.

use thiserror::Error;

use crate::settings::Settings;

/// Palette indexed by the `c` key
const PALETTE: [&str; 8] = [
    "#ffffff", // white
    "#00ff00", // green
    "#7fff00", // yellow green
    "#dfff00", // green yellow
    "#ffff00", // yellow
    "#00ffff", // cyan
    "#ff00ff", // pink
    "#ff0000", // red
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("invalid crosshair code format")]
    InvalidFormat,
}

/// Crosshair fields a code sets; `None` leaves the current value alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrosshairPatch {
    pub color: Option<String>,
    pub outline: Option<bool>,
    pub outline_thickness: Option<f32>,
    pub outline_opacity: Option<f32>,
    pub dot: Option<bool>,
    pub dot_size: Option<f32>,
    pub dot_opacity: Option<f32>,
    pub inner_show: Option<bool>,
    pub inner_length: Option<f32>,
    pub inner_thickness: Option<f32>,
    pub inner_offset: Option<f32>,
    pub inner_opacity: Option<f32>,
    pub outer_show: Option<bool>,
    pub outer_length: Option<f32>,
    pub outer_thickness: Option<f32>,
    pub outer_offset: Option<f32>,
    pub outer_opacity: Option<f32>,
}

impl CrosshairPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply_to(&self, s: &mut Settings) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(v) = value {
                *slot = v.clone();
            }
        }

        set(&mut s.crosshair_color, &self.color);
        set(&mut s.crosshair_outline, &self.outline);
        set(&mut s.crosshair_outline_thickness, &self.outline_thickness);
        set(&mut s.crosshair_outline_opacity, &self.outline_opacity);
        set(&mut s.crosshair_dot, &self.dot);
        set(&mut s.crosshair_dot_size, &self.dot_size);
        set(&mut s.crosshair_dot_opacity, &self.dot_opacity);
        set(&mut s.crosshair_inner_show, &self.inner_show);
        set(&mut s.crosshair_inner_length, &self.inner_length);
        set(&mut s.crosshair_inner_thickness, &self.inner_thickness);
        set(&mut s.crosshair_inner_offset, &self.inner_offset);
        set(&mut s.crosshair_inner_opacity, &self.inner_opacity);
        set(&mut s.crosshair_outer_show, &self.outer_show);
        set(&mut s.crosshair_outer_length, &self.outer_length);
        set(&mut s.crosshair_outer_thickness, &self.outer_thickness);
        set(&mut s.crosshair_outer_offset, &self.outer_offset);
        set(&mut s.crosshair_outer_opacity, &self.outer_opacity);
    }
}

fn number(value: &str) -> Result<f32, ImportError> {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ImportError::InvalidFormat)
}

fn flag(value: &str) -> bool {
    value != "0"
}

/// Decode the primary crosshair section of a share code
pub fn parse_crosshair_code(code: &str) -> Result<CrosshairPatch, ImportError> {
    if !code.starts_with("0;") {
        return Err(ImportError::InvalidFormat);
    }

    let tokens: Vec<&str> = code.split(';').collect();
    let mut patch = CrosshairPatch::default();
    let mut primary = false;

    let mut i = 0;
    while i < tokens.len() {
        let key = tokens[i];
        i += 1;

        match key {
            "P" => {
                primary = true;
                continue;
            }
            "A" | "S" => {
                primary = false;
                continue;
            }
            _ if !primary => continue,
            _ => {}
        }

        let value = match tokens.get(i) {
            Some(v) if !v.is_empty() => *v,
            _ => continue,
        };

        let consumed = match key {
            "c" => {
                let index = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| ImportError::InvalidFormat)?;
                if let Some(color) = PALETTE.get(index) {
                    patch.color = Some((*color).to_string());
                }
                true
            }
            "u" => {
                patch.color = Some(format!("#{}", value));
                true
            }
            "h" => {
                patch.outline = Some(flag(value));
                true
            }
            "t" => {
                patch.outline_thickness = Some(number(value)?);
                true
            }
            "o" => {
                patch.outline_opacity = Some(number(value)?);
                true
            }
            "d" => {
                patch.dot = Some(flag(value));
                true
            }
            "z" => {
                patch.dot_size = Some(number(value)?);
                true
            }
            "a" => {
                patch.dot_opacity = Some(number(value)?);
                true
            }
            "0b" => {
                patch.inner_show = Some(flag(value));
                true
            }
            "0l" => {
                patch.inner_length = Some(number(value)?);
                true
            }
            "0t" => {
                patch.inner_thickness = Some(number(value)?);
                true
            }
            "0o" => {
                patch.inner_offset = Some(number(value)?);
                true
            }
            "0a" => {
                patch.inner_opacity = Some(number(value)?);
                true
            }
            "1b" => {
                patch.outer_show = Some(flag(value));
                true
            }
            "1l" => {
                patch.outer_length = Some(number(value)?);
                true
            }
            "1t" => {
                patch.outer_thickness = Some(number(value)?);
                true
            }
            "1o" => {
                patch.outer_offset = Some(number(value)?);
                true
            }
            "1a" => {
                patch.outer_opacity = Some(number(value)?);
                true
            }
            _ => false,
        };

        if consumed {
            i += 1;
        }
    }

    Ok(patch)
}

/// Apply a share code on top of `current`. Nothing is applied if the code
/// is malformed.
pub fn import_crosshair_code(code: &str, current: &Settings) -> Result<Settings, ImportError> {
    let patch = parse_crosshair_code(code)?;
    let mut updated = current.clone();
    patch.apply_to(&mut updated);
    log::info!("Imported crosshair code");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_header() {
        assert_eq!(parse_crosshair_code("P;c;1"), Err(ImportError::InvalidFormat));
        assert_eq!(parse_crosshair_code(""), Err(ImportError::InvalidFormat));
    }

    #[test]
    fn test_nothing_before_primary() {
        let patch = parse_crosshair_code("0;c;1;h;0").unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_primary_fields() {
        let patch = parse_crosshair_code("0;P;c;5;h;0;t;2;o;0.8;d;1;z;3;a;0.5;0l;4;0o;2;0a;1;1b;0").unwrap();
        assert_eq!(patch.color.as_deref(), Some("#00ffff"));
        assert_eq!(patch.outline, Some(false));
        assert_eq!(patch.outline_thickness, Some(2.0));
        assert_eq!(patch.outline_opacity, Some(0.8));
        assert_eq!(patch.dot, Some(true));
        assert_eq!(patch.dot_size, Some(3.0));
        assert_eq!(patch.dot_opacity, Some(0.5));
        assert_eq!(patch.inner_length, Some(4.0));
        assert_eq!(patch.inner_offset, Some(2.0));
        assert_eq!(patch.inner_opacity, Some(1.0));
        assert_eq!(patch.outer_show, Some(false));
        assert_eq!(patch.inner_show, None);
    }

    #[test]
    fn test_custom_color() {
        let patch = parse_crosshair_code("0;P;u;FF8800FF").unwrap();
        assert_eq!(patch.color.as_deref(), Some("#FF8800FF"));
    }

    #[test]
    fn test_palette_out_of_range_ignored() {
        let patch = parse_crosshair_code("0;P;c;9;h;1").unwrap();
        assert_eq!(patch.color, None);
        assert_eq!(patch.outline, Some(true));
    }

    #[test]
    fn test_other_profiles_skipped() {
        let patch = parse_crosshair_code("0;P;c;1;A;c;7;0l;10;S;d;1").unwrap();
        assert_eq!(patch.color.as_deref(), Some("#00ff00"));
        assert_eq!(patch.inner_length, None);
        assert_eq!(patch.dot, None);
    }

    #[test]
    fn test_bad_number_fails_whole_import() {
        assert_eq!(
            parse_crosshair_code("0;P;h;0;0l;wide"),
            Err(ImportError::InvalidFormat)
        );

        let current = Settings::default();
        assert!(import_crosshair_code("0;P;h;0;t;nan", &current).is_err());
    }

    #[test]
    fn test_trailing_key_without_value() {
        let patch = parse_crosshair_code("0;P;h;0;0l;").unwrap();
        assert_eq!(patch.outline, Some(false));
        assert_eq!(patch.inner_length, None);
    }

    #[test]
    fn test_import_applies_over_settings() {
        let current = Settings::default();
        let updated = import_crosshair_code("0;P;c;7;d;1;1b;1;1l;5", &current).unwrap();
        assert_eq!(updated.crosshair_color, "#ff0000");
        assert!(updated.crosshair_dot);
        assert!(updated.crosshair_outer_show);
        assert_eq!(updated.crosshair_outer_length, 5.0);
        // Untouched fields survive
        assert_eq!(updated.crosshair_inner_length, current.crosshair_inner_length);
        assert_eq!(updated.target_size, current.target_size);
    }
}
