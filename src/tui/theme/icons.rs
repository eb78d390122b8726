//! Nerd Font icons for TUI display
//! Requires a Nerd Font to be installed (https://www.nerdfonts.com)

/// Icon set using Nerd Font glyphs
#[derive(Debug, Clone)]
pub struct Icons {
    // Screens
    pub settings: &'static str,
    pub help: &'static str,
    pub lyrics: &'static str,
    pub star: &'static str,

    // Status
    pub success: &'static str,
    pub error: &'static str,
    pub loading: &'static str,
    pub info: &'static str,
    pub next: &'static str,

    // Music
    pub music: &'static str,
    pub playlist: &'static str,

    // Selection
    pub selected: &'static str,
}

impl Icons {
    /// Nerd Font icon set
    pub const fn nerd() -> Self {
        Self {
            settings: "\u{f013}",       // nf-fa-cog
            help: "\u{f059}",           // nf-fa-question_circle
            lyrics: "\u{f15c}",         // nf-fa-file_text_o
            star: "\u{f005}",           // nf-fa-star

            success: "\u{f00c}",        // nf-fa-check
            error: "\u{f00d}",          // nf-fa-times
            loading: "\u{f110}",        // nf-fa-spinner
            info: "\u{f05a}",           // nf-fa-info_circle
            next: "\u{f051}",           // nf-fa-step_forward

            music: "\u{f001}",          // nf-fa-music
            playlist: "\u{f0cb}",       // nf-fa-list_ol

            selected: "\u{f054}",       // nf-fa-chevron_right
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::nerd()
    }
}
