use wedge::pointer::PointerEvent;

#[derive(Debug, Clone)]
pub enum AppEvent {
    Pointer(PointerEvent),
    Dismiss,
    ConfigReload,
}
