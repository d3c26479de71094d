use std::fmt;

/// Lifecycle of one page controller as tracked by the router.
///
/// `Unmounted -> Rendering -> Activating -> Ready -> Deactivating -> Unmounted`.
/// Follow-up work scheduled by a ready page (map initialisation, event
/// handlers) does not leave `Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageState {
    #[default]
    Unmounted,
    Rendering,
    Activating,
    Ready,
    Deactivating,
}

impl PageState {
    /// True while the page owns the document.
    pub fn is_mounted(&self) -> bool {
        matches!(self, Self::Rendering | Self::Activating | Self::Ready)
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unmounted => "unmounted",
            Self::Rendering => "rendering",
            Self::Activating => "activating",
            Self::Ready => "ready",
            Self::Deactivating => "deactivating",
        };
        f.write_str(name)
    }
}
