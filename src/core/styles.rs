//! Style roles for `ceq` output
//!
//! Each logical role maps to a `colored::Color`. The statistics table renders roles as
//! prettytable style specs and `--help` renders them through clap's styling, so both
//! surfaces share one palette. Callers decide once whether colour is enabled.
//!
//! ```
//! use cache_event_queue::core::styles::StyleRole;
//! assert_eq!(StyleRole::Valid.to_prettytable_spec().as_deref(), Some("Fg"));
//! assert_eq!(StyleRole::Value.to_prettytable_spec(), None);
//! ```

use clap::builder::styling::{AnsiColor, Color as ClapColor, Style, Styles};
use colored::Color;

// Defines the enum variants and their associated colour
macro_rules! style {
    ( $( $variant:ident => $color:expr ),+ $(,)? ) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub enum StyleRole { $( $variant ),+ }

        impl StyleRole {
            pub fn color(self) -> Option<Color> {
                match self { $( StyleRole::$variant => $color ),+ }
            }
        }
    }
}

style! {
    Header      => Some(Color::Yellow),
    Key         => Some(Color::BrightGreen),
    Value       => None,
    Valid       => Some(Color::Green),
    Invalid     => Some(Color::Red),
    Literal     => Some(Color::Cyan),
    Placeholder => Some(Color::Green),
    Error       => Some(Color::BrightRed),
}

/// prettytable foreground letter and clap colour for the 16 basic terminal colours
fn basic_color(color: Color) -> Option<(char, AnsiColor)> {
    Some(match color {
        Color::Black => ('k', AnsiColor::Black),
        Color::Red => ('r', AnsiColor::Red),
        Color::Green => ('g', AnsiColor::Green),
        Color::Yellow => ('y', AnsiColor::Yellow),
        Color::Blue => ('b', AnsiColor::Blue),
        Color::Magenta => ('m', AnsiColor::Magenta),
        Color::Cyan => ('c', AnsiColor::Cyan),
        Color::White => ('w', AnsiColor::White),
        Color::BrightBlack => ('K', AnsiColor::BrightBlack),
        Color::BrightRed => ('R', AnsiColor::BrightRed),
        Color::BrightGreen => ('G', AnsiColor::BrightGreen),
        Color::BrightYellow => ('Y', AnsiColor::BrightYellow),
        Color::BrightBlue => ('B', AnsiColor::BrightBlue),
        Color::BrightMagenta => ('M', AnsiColor::BrightMagenta),
        Color::BrightCyan => ('C', AnsiColor::BrightCyan),
        Color::BrightWhite => ('W', AnsiColor::BrightWhite),
        _ => return None,
    })
}

impl StyleRole {
    /// prettytable style spec (foreground only) for this role
    pub fn to_prettytable_spec(self) -> Option<String> {
        let (letter, _) = basic_color(self.color()?)?;
        Some(format!("F{}", letter))
    }

    fn to_clap_style(self, bold: bool) -> Style {
        let mut style = Style::new();
        if let Some((_, ansi)) = self.color().and_then(basic_color) {
            style = style.fg_color(Some(ClapColor::Ansi(ansi)));
        }
        if bold {
            style = style.bold();
        }
        style
    }
}

/// Build clap help styles from the same roles
pub fn palette_to_clap(enabled: bool) -> Styles {
    if !enabled {
        return Styles::plain();
    }

    Styles::styled()
        .header(StyleRole::Header.to_clap_style(true))
        .usage(StyleRole::Header.to_clap_style(true))
        .literal(StyleRole::Literal.to_clap_style(false))
        .placeholder(StyleRole::Placeholder.to_clap_style(false))
        .valid(StyleRole::Valid.to_clap_style(false))
        .invalid(StyleRole::Invalid.to_clap_style(false))
        .error(StyleRole::Error.to_clap_style(false))
}
