use serde::{Deserialize, Serialize};

/// Rich-text colors understood by the host console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LogColor {
    #[default]
    Default,
    Red,
    Green,
    Blue,
    Yellow,
    Magenta,
    Cyan,
    White,
    Black,
    Gray,
    DarkRed,
    DarkGreen,
    DarkBlue,
    DarkYellow,
    DarkMagenta,
    DarkCyan,
}

impl LogColor {
    pub const fn name(self) -> &'static str {
        match self {
            LogColor::Default => "Default",
            LogColor::Red => "Red",
            LogColor::Green => "Green",
            LogColor::Blue => "Blue",
            LogColor::Yellow => "Yellow",
            LogColor::Magenta => "Magenta",
            LogColor::Cyan => "Cyan",
            LogColor::White => "White",
            LogColor::Black => "Black",
            LogColor::Gray => "Gray",
            LogColor::DarkRed => "DarkRed",
            LogColor::DarkGreen => "DarkGreen",
            LogColor::DarkBlue => "DarkBlue",
            LogColor::DarkYellow => "DarkYellow",
            LogColor::DarkMagenta => "DarkMagenta",
            LogColor::DarkCyan => "DarkCyan",
        }
    }

    /// `#RRGGBB`, or None for [`LogColor::Default`].
    pub const fn hex(self) -> Option<&'static str> {
        match self {
            LogColor::Default => None,
            LogColor::Red => Some("#FF0000"),
            LogColor::Green => Some("#00FF00"),
            LogColor::Blue => Some("#0000FF"),
            LogColor::Yellow => Some("#FFFF00"),
            LogColor::Magenta => Some("#FF00FF"),
            LogColor::Cyan => Some("#00FFFF"),
            LogColor::White => Some("#FFFFFF"),
            LogColor::Black => Some("#000000"),
            LogColor::Gray => Some("#808080"),
            LogColor::DarkRed => Some("#800000"),
            LogColor::DarkGreen => Some("#008000"),
            LogColor::DarkBlue => Some("#000080"),
            LogColor::DarkYellow => Some("#808000"),
            LogColor::DarkMagenta => Some("#800080"),
            LogColor::DarkCyan => Some("#008080"),
        }
    }

    /// Wrap `message` in a `<color>` tag. Default leaves it untouched.
    pub fn paint(self, message: &str) -> String {
        match self.hex() {
            Some(hex) => format!("<color={hex}>{message}</color>"),
            None => message.to_string(),
        }
    }
}

impl std::fmt::Display for LogColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint() {
        assert_eq!(LogColor::Red.paint("hot"), "<color=#FF0000>hot</color>");
        assert_eq!(LogColor::DarkCyan.paint("x"), "<color=#008080>x</color>");
        assert_eq!(LogColor::Default.paint("plain"), "plain");
    }

    #[test]
    fn test_name() {
        assert_eq!(LogColor::DarkYellow.to_string(), "DarkYellow");
        assert_eq!(LogColor::default(), LogColor::Default);
    }
}
