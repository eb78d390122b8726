#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    Resize,

    // Text entry (source field or guess box)
    InputChar(char),
    Backspace,
    ClearInput,

    // Settings form
    FocusNext,
    FocusPrev,
    /// Cancel: back to the source field.
    FocusSource,
    /// Left/Right on the focused row.
    Adjust(i8),
    /// Space/Enter on a toggle row.
    Toggle,
    LoadPlaylist,
    StartGame,

    // Round
    SubmitGuess,
    SuggestionUp,
    SuggestionDown,
    RevealNextLine,
    Skip,
    RetrySelection,
    /// Back to the settings form.
    NewGame,
}
