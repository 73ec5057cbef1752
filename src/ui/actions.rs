// Action system for the table viewer
// Every input event is mapped to one Action before it reaches the session

/// All possible actions that can be triggered in the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation actions
    Navigate(NavigateAction),

    // Column operations
    ToggleColumnVisibility,
    ConvertColumnToInteger,
    ConvertAllToText,

    // Data operations
    FeedAll,
    Sort(SortDirection),

    // View operations
    ToggleHeader,
    Resize(u16, u16),

    // Application control
    Quit,
}

/// Navigation actions with optional counts for vim-style motions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateAction {
    Up(usize),
    Down(usize),
    Left(usize),
    Right(usize),
    /// Half of the visible rows
    PageUp,
    PageDown,
    /// Half of the visible columns
    PageLeft,
    PageRight,
    FirstRow,
    LastRow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }
}

impl Action {
    /// Whether handling this action may read the rest of the input
    pub fn needs_full_input(&self) -> bool {
        matches!(
            self,
            Action::FeedAll
                | Action::Sort(_)
                | Action::ConvertColumnToInteger
                | Action::ConvertAllToText
                | Action::Navigate(NavigateAction::LastRow)
        )
    }
}
