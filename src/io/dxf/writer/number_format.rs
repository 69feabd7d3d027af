//! Floating point formatting for text DXF

/// How the text writer prints real values
///
/// The output never depends on the process locale: the decimal separator is
/// always a period and digits are never grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NumberFormat {
    decimals: Option<u8>,
}

impl NumberFormat {
    /// Shortest representation that reads back to the same value; integral
    /// values keep a trailing `.0`
    pub const INVARIANT: NumberFormat = NumberFormat { decimals: None };

    /// Round to `decimals` places and trim trailing zeros
    pub const fn fixed(decimals: u8) -> Self {
        NumberFormat {
            decimals: Some(decimals),
        }
    }

    /// Fixed number of decimals, if any
    pub fn decimals(&self) -> Option<u8> {
        self.decimals
    }

    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return format!("{}", value);
        }
        let mut text = match self.decimals {
            None => format!("{}", value),
            Some(decimals) => {
                let fixed = format!("{:.*}", decimals as usize, value);
                if fixed.contains('.') {
                    fixed.trim_end_matches('0').to_string()
                } else {
                    fixed
                }
            }
        };
        if text.ends_with('.') {
            text.push('0');
        } else if !text.contains('.') {
            text.push_str(".0");
        }
        if text == "-0.0" {
            text.remove(0);
        }
        text
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::INVARIANT
    }
}
