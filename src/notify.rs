use std::time::Duration;

/// Delay before a new notification slides into view.
pub const SLIDE_IN_AFTER: Duration = Duration::from_millis(100);
/// Time from creation until the notification starts sliding out.
pub const SLIDE_OUT_AFTER: Duration = Duration::from_millis(3000);
/// Length of the slide-out animation before the notification is detached.
pub const DETACH_AFTER: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub fn color(self) -> &'static str {
        match self {
            Self::Success => "#4CAF50",
            Self::Error => "#f44336",
            Self::Info => "#2196F3",
            Self::Warning => "#ff9800",
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Visible,
    Leaving,
}

/// Timer events that move a notification through its phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SlideIn,
    SlideOut,
    Detach,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub severity: Severity,
    pub phase: Phase,
}

#[derive(Debug, Clone, Default)]
pub struct Notifications {
    next_id: u64,
    items: Vec<Notification>,
}

impl Notifications {
    /// Adds a notification and returns its id. The caller schedules the
    /// `SlideIn` and `SlideOut` stages.
    pub fn push(&mut self, message: impl Into<String>, severity: Severity) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.items.push(Notification {
            id,
            message: message.into(),
            severity,
            phase: Phase::Entering,
        });
        id
    }

    /// Applies a stage. Returns `true` when the notification was found.
    pub fn advance(&mut self, id: u64, stage: Stage) -> bool {
        let Some(index) = self.items.iter().position(|item| item.id == id) else {
            return false;
        };
        match stage {
            Stage::SlideIn => self.items[index].phase = Phase::Visible,
            Stage::SlideOut => self.items[index].phase = Phase::Leaving,
            Stage::Detach => {
                self.items.remove(index);
            }
        }
        true
    }

    pub fn get(&self, id: u64) -> Option<&Notification> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.items.last()
    }
}

pub fn total_lifetime() -> Duration {
    SLIDE_OUT_AFTER + DETACH_AFTER
}
