//! Callback interface for decoded events

use std::collections::HashSet;

use tracing::warn;

use crate::event_types::*;

/// Receives decoded events from `EventClient::subscribe`
///
/// Every method has an empty default body, so implementors only override
/// the events they care about. Methods are only called for event types
/// included in the subscription.
///
/// # Example
///
/// ```ignore
/// struct TitleLogger;
///
/// impl EventHandler for TitleLogger {
///     fn active_window(&mut self, window: ActiveWindow) {
///         println!("{}: {}", window.class, window.title);
///     }
/// }
///
/// client.subscribe(&mut TitleLogger, &[EventType::ActiveWindow]).await
/// ```
pub trait EventHandler {
    fn workspace(&mut self, _name: WorkspaceName) {}
    fn focused_monitor(&mut self, _focused: FocusedMonitor) {}
    fn active_window(&mut self, _window: ActiveWindow) {}
    fn fullscreen(&mut self, _fullscreen: bool) {}
    fn monitor_removed(&mut self, _name: MonitorName) {}
    fn monitor_added(&mut self, _name: MonitorName) {}
    fn create_workspace(&mut self, _name: WorkspaceName) {}
    fn destroy_workspace(&mut self, _name: WorkspaceName) {}
    fn move_workspace(&mut self, _moved: MoveWorkspace) {}
    fn active_layout(&mut self, _layout: ActiveLayout) {}
    fn open_window(&mut self, _window: OpenWindow) {}
    fn close_window(&mut self, _window: CloseWindow) {}
    fn move_window(&mut self, _moved: MoveWindow) {}
    fn open_layer(&mut self, _namespace: LayerNamespace) {}
    fn close_layer(&mut self, _namespace: LayerNamespace) {}
    fn sub_map(&mut self, _name: SubMapName) {}
    fn screencast(&mut self, _screencast: Screencast) {}
}

/// Handler that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEventHandler;

impl EventHandler for NoopEventHandler {}

/// Invoke the handler method matching a decoded event
pub fn dispatch_event<H>(handler: &mut H, event: Event)
where
    H: EventHandler + ?Sized,
{
    match event {
        Event::Workspace(name) => handler.workspace(name),
        Event::FocusedMonitor(focused) => handler.focused_monitor(focused),
        Event::ActiveWindow(window) => handler.active_window(window),
        Event::Fullscreen(fullscreen) => handler.fullscreen(fullscreen),
        Event::MonitorRemoved(name) => handler.monitor_removed(name),
        Event::MonitorAdded(name) => handler.monitor_added(name),
        Event::CreateWorkspace(name) => handler.create_workspace(name),
        Event::DestroyWorkspace(name) => handler.destroy_workspace(name),
        Event::MoveWorkspace(moved) => handler.move_workspace(moved),
        Event::ActiveLayout(layout) => handler.active_layout(layout),
        Event::OpenWindow(window) => handler.open_window(window),
        Event::CloseWindow(window) => handler.close_window(window),
        Event::MoveWindow(moved) => handler.move_window(moved),
        Event::OpenLayer(namespace) => handler.open_layer(namespace),
        Event::CloseLayer(namespace) => handler.close_layer(namespace),
        Event::SubMap(name) => handler.sub_map(name),
        Event::Screencast(screencast) => handler.screencast(screencast),
    }
}

/// Decode and dispatch the subscribed events of one chunk, in arrival order
///
/// Records outside `subscribed` are dropped before decoding. Records that
/// fail to decode are logged and skipped.
pub(crate) fn process_events<H>(
    handler: &mut H,
    events: Vec<ReceivedEvent>,
    subscribed: &HashSet<EventType>,
) where
    H: EventHandler + ?Sized,
{
    for received in events {
        if !subscribed.contains(&received.kind) {
            continue;
        }

        match Event::decode(&received) {
            Ok(event) => dispatch_event(handler, event),
            Err(e) => warn!(error = %e, "Skipping malformed Hyprland event"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every callback as the equivalent `Event`
    #[derive(Default)]
    struct RecordingHandler {
        calls: Vec<Event>,
    }

    impl EventHandler for RecordingHandler {
        fn workspace(&mut self, name: WorkspaceName) {
            self.calls.push(Event::Workspace(name));
        }
        fn focused_monitor(&mut self, focused: FocusedMonitor) {
            self.calls.push(Event::FocusedMonitor(focused));
        }
        fn active_window(&mut self, window: ActiveWindow) {
            self.calls.push(Event::ActiveWindow(window));
        }
        fn fullscreen(&mut self, fullscreen: bool) {
            self.calls.push(Event::Fullscreen(fullscreen));
        }
        fn monitor_removed(&mut self, name: MonitorName) {
            self.calls.push(Event::MonitorRemoved(name));
        }
        fn monitor_added(&mut self, name: MonitorName) {
            self.calls.push(Event::MonitorAdded(name));
        }
        fn create_workspace(&mut self, name: WorkspaceName) {
            self.calls.push(Event::CreateWorkspace(name));
        }
        fn destroy_workspace(&mut self, name: WorkspaceName) {
            self.calls.push(Event::DestroyWorkspace(name));
        }
        fn move_workspace(&mut self, moved: MoveWorkspace) {
            self.calls.push(Event::MoveWorkspace(moved));
        }
        fn active_layout(&mut self, layout: ActiveLayout) {
            self.calls.push(Event::ActiveLayout(layout));
        }
        fn open_window(&mut self, window: OpenWindow) {
            self.calls.push(Event::OpenWindow(window));
        }
        fn close_window(&mut self, window: CloseWindow) {
            self.calls.push(Event::CloseWindow(window));
        }
        fn move_window(&mut self, moved: MoveWindow) {
            self.calls.push(Event::MoveWindow(moved));
        }
        fn open_layer(&mut self, namespace: LayerNamespace) {
            self.calls.push(Event::OpenLayer(namespace));
        }
        fn close_layer(&mut self, namespace: LayerNamespace) {
            self.calls.push(Event::CloseLayer(namespace));
        }
        fn sub_map(&mut self, name: SubMapName) {
            self.calls.push(Event::SubMap(name));
        }
        fn screencast(&mut self, screencast: Screencast) {
            self.calls.push(Event::Screencast(screencast));
        }
    }

    /// One record per event type, as captured from a live session
    fn sample_events() -> Vec<ReceivedEvent> {
        vec![
            ReceivedEvent::new(EventType::Workspace, "1"),
            ReceivedEvent::new(EventType::FocusedMonitor, "DP-1,1"),
            ReceivedEvent::new(
                EventType::ActiveWindow,
                "jetbrains-goland,hyprland-ipc – ipc.go",
            ),
            ReceivedEvent::new(EventType::Fullscreen, "1"),
            ReceivedEvent::new(EventType::MonitorRemoved, "HDMI-A-1"),
            ReceivedEvent::new(EventType::MonitorAdded, "HDMI-A-1"),
            ReceivedEvent::new(EventType::CreateWorkspace, "3"),
            ReceivedEvent::new(EventType::DestroyWorkspace, "3"),
            ReceivedEvent::new(EventType::MoveWorkspace, "1,DP-2"),
            ReceivedEvent::new(EventType::ActiveLayout, "AT Translated Set 2 keyboard,Russian"),
            ReceivedEvent::new(EventType::OpenWindow, "80e62df0,2,jetbrains-goland,win430"),
            ReceivedEvent::new(EventType::CloseWindow, "80e62df0"),
            ReceivedEvent::new(EventType::MoveWindow, "80e62df0,1"),
            ReceivedEvent::new(EventType::OpenLayer, "wofi"),
            ReceivedEvent::new(EventType::CloseLayer, "wofi"),
            ReceivedEvent::new(EventType::SubMap, "resize"),
            ReceivedEvent::new(EventType::Screencast, "1,0"),
        ]
    }

    fn subscription(kinds: &[EventType]) -> HashSet<EventType> {
        kinds.iter().copied().collect()
    }

    #[test]
    fn test_every_event_reaches_its_callback() {
        let mut handler = RecordingHandler::default();
        process_events(&mut handler, sample_events(), &subscription(EventType::all()));

        assert_eq!(handler.calls.len(), EventType::all().len());

        let kinds: Vec<EventType> = handler.calls.iter().map(Event::kind).collect();
        assert_eq!(kinds, EventType::all().to_vec(), "Dispatch must keep arrival order");

        assert_eq!(handler.calls[0], Event::Workspace("1".to_string()));
        assert_eq!(
            handler.calls[1],
            Event::FocusedMonitor(FocusedMonitor {
                monitor_name: "DP-1".to_string(),
                workspace_name: "1".to_string(),
            })
        );
        assert_eq!(
            handler.calls[9],
            Event::ActiveLayout(ActiveLayout {
                keyboard: "AT Translated Set 2 keyboard".to_string(),
                layout: "Russian".to_string(),
            })
        );
        assert_eq!(handler.calls[15], Event::SubMap("resize".to_string()));
    }

    #[test]
    fn test_unsubscribed_events_never_dispatched() {
        let mut handler = RecordingHandler::default();
        let subscribed = subscription(&[EventType::OpenWindow, EventType::CloseWindow]);
        process_events(&mut handler, sample_events(), &subscribed);

        assert_eq!(handler.calls.len(), 2);
        assert!(handler
            .calls
            .iter()
            .all(|event| subscribed.contains(&event.kind())));
    }

    #[test]
    fn test_empty_subscription_dispatches_nothing() {
        let mut handler = RecordingHandler::default();
        process_events(&mut handler, sample_events(), &HashSet::new());
        assert!(handler.calls.is_empty());
    }

    #[test]
    fn test_malformed_event_is_skipped() {
        let mut handler = RecordingHandler::default();
        let events = vec![
            ReceivedEvent::new(EventType::OpenWindow, "80e62df0"),
            ReceivedEvent::new(EventType::Workspace, "4"),
        ];
        process_events(&mut handler, events, &subscription(EventType::all()));

        assert_eq!(handler.calls, vec![Event::Workspace("4".to_string())]);
    }

    #[test]
    fn test_noop_handler_accepts_everything() {
        let mut handler = NoopEventHandler;
        process_events(&mut handler, sample_events(), &subscription(EventType::all()));
    }

    #[test]
    fn test_dispatch_through_trait_object() {
        let mut recording = RecordingHandler::default();
        {
            let handler: &mut dyn EventHandler = &mut recording;
            dispatch_event(handler, Event::Fullscreen(false));
        }
        assert_eq!(recording.calls, vec![Event::Fullscreen(false)]);
    }
}
