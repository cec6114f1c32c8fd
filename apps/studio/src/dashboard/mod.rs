// Dashboard shell: tabbed create / library / settings screens rendered server-side.
// Generation goes through the client wrappers, which only ever reach the proxy routes.

pub mod create;
pub mod handlers;
pub mod session;
pub mod settings;
pub mod views;

pub use session::Session;
pub use settings::{InMemorySettingsStore, SettingsStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Create,
    Library,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Create, Tab::Library, Tab::Settings];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Create => "create",
            Tab::Library => "library",
            Tab::Settings => "settings",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Create => "Create Content",
            Tab::Library => "My Content",
            Tab::Settings => "Settings",
        }
    }

    /// Unknown or missing values select the create tab.
    pub fn parse_or_default(raw: Option<&str>) -> Tab {
        Tab::ALL
            .into_iter()
            .find(|tab| Some(tab.as_str()) == raw)
            .unwrap_or_default()
    }
}
