use chevron::Action;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Remote(Action),
    ConfigReload,
}
