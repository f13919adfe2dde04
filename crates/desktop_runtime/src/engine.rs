//! The UI command engine: applies assistant-issued command batches to the
//! desktop state and reports what the host must do next as effects.

use app_secure_notes::PhotoCreatorState;
use command_contract::{
    CommandAction, CommandSpec, ComponentKind, ElementKind, UiCommand, UiRect,
};
use gamification::Progression;
use platform_host::{MediaCaptureService, MediaStreamHandle};
use secure_vault::{SecureItemKind, VaultStore};
use uuid::Uuid;

use crate::model::{Component, TimerState, WindowCollection, WindowKind, WindowRecord, WindowState};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Informational line, including the per-command audit trail.
    Info,
    /// Something went wrong and the user should see it.
    Error,
}

/// One user-facing notification line.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Display text.
    pub text: String,
    /// Severity.
    pub kind: NoticeKind,
}

impl Notice {
    /// Informational notice.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Info,
        }
    }

    /// Error notice.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
        }
    }
}

/// Side effect the host must execute after a state transition.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeEffect {
    /// Show a notification.
    Notify(Notice),
    /// Persist the window collection.
    PersistWindows,
    /// Persist the secure vault.
    PersistVault,
    /// Persist progression, quests, and achievements.
    PersistProgression,
    /// Schedule the tic-tac-toe opponent's turn after its think delay.
    ScheduleOpponentMove {
        /// Window whose game awaits the opponent.
        window_id: String,
    },
    /// Send a prompt to the assistant as if the user had typed it.
    ForwardToAssistant(String),
    /// Start an image generation call for an image-generator window.
    GenerateImage {
        /// Window that owns the request.
        window_id: String,
        /// Prompt to render.
        prompt: String,
    },
}

/// The whole in-memory desktop: windows, vault, progression, clipboard, and
/// the active capture stream.
#[derive(Debug, Default)]
pub struct DesktopState {
    /// All windows, hidden ones included.
    pub windows: WindowCollection,
    /// Encrypted notes and photos.
    pub vault: VaultStore,
    /// Gamification aggregate.
    pub progression: Progression,
    /// Single clipboard slot filled by COPY.
    pub clipboard: Option<String>,
    /// Capture stream backing visible live views, if any.
    pub active_stream: Option<MediaStreamHandle>,
}

/// Tracks which persistence domains a batch touched so each persist effect
/// is emitted at most once per batch.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct DirtyFlags {
    pub windows: bool,
    pub vault: bool,
    pub progression: bool,
}

impl DirtyFlags {
    pub(crate) fn push_persist_effects(self, effects: &mut Vec<RuntimeEffect>) {
        if self.windows {
            effects.push(RuntimeEffect::PersistWindows);
        }
        if self.vault {
            effects.push(RuntimeEffect::PersistVault);
        }
        if self.progression {
            effects.push(RuntimeEffect::PersistProgression);
        }
    }
}

const SINGLETON_DASHBOARD: &str = "dashboard-main";
const SINGLETON_APP_LAUNCHER: &str = "app-launcher-main";
const SINGLETON_GAME_HUB: &str = "game-hub-main";

fn singleton_id(kind: WindowKind) -> Option<&'static str> {
    match kind {
        WindowKind::Dashboard => Some(SINGLETON_DASHBOARD),
        WindowKind::AppLauncher => Some(SINGLETON_APP_LAUNCHER),
        WindowKind::GameHub => Some(SINGLETON_GAME_HUB),
        _ => None,
    }
}

fn singleton_rect(kind: WindowKind) -> UiRect {
    match kind {
        WindowKind::Dashboard => UiRect::new(5.0, 5.0, 90.0, 85.0),
        _ => UiRect::new(10.0, 10.0, 80.0, 75.0),
    }
}

fn singleton_title(kind: WindowKind) -> &'static str {
    match kind {
        WindowKind::Dashboard => "System Dashboard",
        WindowKind::AppLauncher => "App Launcher",
        _ => "Game Hub",
    }
}

/// Applies one parsed command batch to the desktop.
///
/// The batch never fails as a whole: invalid commands are skipped with an
/// error notice and the rest still apply. Each command also leaves an
/// informational audit notice. Media capture for live-view components is the
/// only awaited operation.
pub async fn apply_commands(
    state: &mut DesktopState,
    commands: &[UiCommand],
    media: &dyn MediaCaptureService,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    let mut dirty = DirtyFlags::default();

    for command in commands {
        effects.push(RuntimeEffect::Notify(Notice::info(command.audit_line())));
        match (command.action, command.element_type) {
            (CommandAction::Create, ElementKind::Window) => {
                create_window(state, command, media, &mut effects, &mut dirty).await;
            }
            (CommandAction::Create, ElementKind::Component) => {
                // Components are created through their window's spec; a bare
                // component CREATE is audited but otherwise ignored.
            }
            (CommandAction::Update, ElementKind::Window) => {
                update_window(state, command, &mut effects, &mut dirty);
            }
            (CommandAction::Update, ElementKind::Component) => {
                update_component(state, command, &mut effects, &mut dirty);
            }
            (CommandAction::Delete, ElementKind::Window) => {
                delete_window(state, command, &mut effects, &mut dirty);
            }
            (CommandAction::Delete, ElementKind::Component) => {
                delete_component(state, command, &mut effects, &mut dirty);
            }
            (CommandAction::Copy, _) => copy_component(state, command),
            (CommandAction::Paste, _) => paste_component(state, command, &mut dirty),
        }
    }

    release_unused_stream(state, media);
    dirty.push_persist_effects(&mut effects);
    effects
}

/// Stops the capture stream once no visible window shows a live view.
pub(crate) fn release_unused_stream(state: &mut DesktopState, media: &dyn MediaCaptureService) {
    if let Some(handle) = state.active_stream {
        if !state.windows.any_visible_live_view() {
            media.release(handle);
            state.active_stream = None;
        }
    }
}

async fn create_window(
    state: &mut DesktopState,
    command: &UiCommand,
    media: &dyn MediaCaptureService,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let Some(spec) = command.spec.as_ref() else {
        effects.push(RuntimeEffect::Notify(Notice::error(
            "CREATE window command is missing its spec.",
        )));
        return;
    };

    let token = spec.window_type.as_deref().or(spec.app_id.as_deref());
    let kind = match token {
        Some(token) => match WindowKind::from_token(token) {
            Some(kind) => kind,
            None => {
                effects.push(RuntimeEffect::Notify(Notice::error(format!(
                    "Unknown window type: {token}"
                ))));
                return;
            }
        },
        // A typeless spec carrying a note name still means a note window.
        None if spec.note_name.is_some() => WindowKind::EncryptedNote,
        None => {
            effects.push(RuntimeEffect::Notify(Notice::error(
                "CREATE window command has no window type.",
            )));
            return;
        }
    };

    if let Some(id) = singleton_id(kind) {
        if state.windows.get(id).is_some() {
            state.windows.reveal_and_raise(id);
            dirty.windows = true;
            return;
        }
        let window = WindowRecord {
            id: id.to_string(),
            title: singleton_title(kind).to_string(),
            rect: singleton_rect(kind),
            z_index: state.windows.max_z() + 1,
            is_hidden: false,
            kind,
            components: Vec::new(),
            note_id: None,
            note_name: None,
            timer_duration_seconds: None,
            state: WindowState::default_for(kind),
        };
        state.windows.insert_or_replace(window);
        dirty.windows = true;
        return;
    }

    match kind {
        WindowKind::SecurePhotoCreator => create_photo_creator_window(state, spec, dirty),
        WindowKind::EncryptedNote => create_note_window(state, spec, effects, dirty),
        _ => create_plain_window(state, spec, kind, media, effects, dirty).await,
    }
}

fn create_photo_creator_window(state: &mut DesktopState, spec: &CommandSpec, dirty: &mut DirtyFlags) {
    let note_name = spec
        .internal_state
        .as_ref()
        .and_then(|v| v.get("noteName"))
        .and_then(|v| v.as_str())
        .unwrap_or("New Secure Photo")
        .to_string();
    let window = WindowRecord {
        id: format!("secure-photo-creator-{}", Uuid::new_v4()),
        title: format!("New Secure Photo: {note_name}"),
        rect: UiRect::new(20.0, 20.0, 40.0, 50.0),
        z_index: state.windows.max_z() + 1,
        is_hidden: false,
        kind: WindowKind::SecurePhotoCreator,
        components: Vec::new(),
        note_id: None,
        note_name: Some(note_name.clone()),
        timer_duration_seconds: None,
        state: WindowState::SecurePhotoCreator(PhotoCreatorState::new(note_name)),
    };
    state.windows.insert_or_replace(window);
    dirty.windows = true;
}

fn create_note_window(
    state: &mut DesktopState,
    spec: &CommandSpec,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let Some(note_name) = spec.note_name.clone() else {
        effects.push(RuntimeEffect::Notify(Notice::error(
            "Encrypted-note window needs a noteName.",
        )));
        return;
    };
    let item_kind = match spec.item_type.as_deref() {
        Some("photo") => SecureItemKind::Photo,
        _ => SecureItemKind::Note,
    };
    let (note_id, created) = state.vault.find_or_create(&note_name, item_kind);
    if created {
        dirty.vault = true;
        if item_kind == SecureItemKind::Note {
            state.progression.note_created();
            dirty.progression = true;
        }
    }

    // A window already bound to this item is revealed instead of duplicated.
    if let Some(existing) = state.windows.window_for_note(&note_id) {
        let id = existing.id.clone();
        state.windows.reveal_and_raise(&id);
        dirty.windows = true;
        return;
    }

    let window = WindowRecord {
        id: format!("encrypted-note-{}", Uuid::new_v4()),
        title: "Encrypted note".to_string(),
        rect: spec.rect.unwrap_or(UiRect::new(15.0, 15.0, 35.0, 45.0)),
        z_index: state.windows.max_z() + 1,
        is_hidden: false,
        kind: WindowKind::EncryptedNote,
        components: spec
            .components
            .as_deref()
            .unwrap_or(&[])
            .iter()
            .map(Component::from_spec)
            .collect(),
        note_id: Some(note_id),
        note_name: Some(note_name),
        timer_duration_seconds: None,
        state: WindowState::default_for(WindowKind::EncryptedNote),
    };
    state.windows.insert_or_replace(window);
    dirty.windows = true;
}

async fn create_plain_window(
    state: &mut DesktopState,
    spec: &CommandSpec,
    kind: WindowKind,
    media: &dyn MediaCaptureService,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let components: Vec<Component> = spec
        .components
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .map(Component::from_spec)
        .collect();

    // Live views need their stream before the window appears; a failed
    // acquisition aborts this window only.
    for component in &components {
        if component.kind != ComponentKind::LiveView {
            continue;
        }
        let Some(source) = component.source else {
            continue;
        };
        match media.acquire(source).await {
            Ok(handle) => {
                if let Some(previous) = state.active_stream.replace(handle) {
                    media.release(previous);
                }
            }
            Err(err) => {
                effects.push(RuntimeEffect::Notify(Notice::error(format!(
                    "Failed to acquire media stream: {}",
                    err.message
                ))));
                return;
            }
        }
    }

    let mut window_state = if kind.is_timer_like() {
        match spec.timer_duration_seconds {
            Some(duration) => WindowState::Timer(TimerState {
                time_remaining: duration,
                timer_running: true,
                scene_id: None,
            }),
            None => WindowState::default_for(kind),
        }
    } else {
        WindowState::default_for(kind)
    };
    if let Some(seed) = &spec.internal_state {
        if let Err(err) = window_state.apply_patch(seed) {
            log::warn!("ignoring malformed internalState seed for {}: {err}", kind.as_token());
        }
    }

    let window = WindowRecord {
        id: spec
            .id
            .clone()
            .unwrap_or_else(|| format!("{}-{}", kind.as_token(), Uuid::new_v4())),
        title: spec.title.clone().unwrap_or_else(|| kind.default_title()),
        rect: spec.rect.unwrap_or(UiRect::new(10.0, 10.0, 40.0, 50.0)),
        z_index: state.windows.max_z() + 1,
        is_hidden: spec.is_hidden.unwrap_or(false),
        kind,
        components,
        note_id: None,
        note_name: None,
        timer_duration_seconds: spec.timer_duration_seconds,
        state: window_state,
    };
    state.windows.insert_or_replace(window);
    dirty.windows = true;
}

fn update_window(
    state: &mut DesktopState,
    command: &UiCommand,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let (Some(target_id), Some(spec)) = (command.target_id.as_deref(), command.spec.as_ref())
    else {
        effects.push(RuntimeEffect::Notify(Notice::error(
            "UPDATE window needs a targetId and a spec.",
        )));
        return;
    };
    let Some(window) = state.windows.get_mut(target_id) else {
        effects.push(RuntimeEffect::Notify(Notice::error(format!(
            "UPDATE window target not found: {target_id}"
        ))));
        return;
    };

    if let Some(title) = &spec.title {
        window.title = title.clone();
    }
    if let Some(rect) = spec.rect {
        window.rect = rect;
    }
    if let Some(is_hidden) = spec.is_hidden {
        window.is_hidden = is_hidden;
    }
    if let Some(components) = &spec.components {
        window.components = components.iter().map(Component::from_spec).collect();
    }
    if let Some(patch) = &spec.internal_state {
        if let Err(err) = window.state.apply_patch(patch) {
            effects.push(RuntimeEffect::Notify(Notice::error(format!(
                "Invalid internalState patch for {target_id}: {err}"
            ))));
        }
    }
    dirty.windows = true;
}

fn update_component(
    state: &mut DesktopState,
    command: &UiCommand,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let (Some(target_id), Some(spec)) = (command.target_id.as_deref(), command.spec.as_ref())
    else {
        effects.push(RuntimeEffect::Notify(Notice::error(
            "UPDATE component needs a targetId and a spec.",
        )));
        return;
    };
    let patch = spec.as_component_spec();
    for window in state.windows.iter_mut() {
        for component in &mut window.components {
            if component.id == target_id {
                component.merge_spec(&patch);
                dirty.windows = true;
                return;
            }
        }
    }
    effects.push(RuntimeEffect::Notify(Notice::error(format!(
        "UPDATE component target not found: {target_id}"
    ))));
}

fn delete_window(
    state: &mut DesktopState,
    command: &UiCommand,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let Some(target_id) = command.target_id.as_deref() else {
        effects.push(RuntimeEffect::Notify(Notice::error(
            "DELETE window needs a targetId.",
        )));
        return;
    };
    let Some(window) = state.windows.get_mut(target_id) else {
        return;
    };
    // Note windows hide instead of closing so the vault binding survives.
    if window.kind == WindowKind::EncryptedNote {
        window.is_hidden = true;
    } else {
        state.windows.remove(target_id);
    }
    dirty.windows = true;
}

fn delete_component(
    state: &mut DesktopState,
    command: &UiCommand,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let Some(target_id) = command.target_id.as_deref() else {
        effects.push(RuntimeEffect::Notify(Notice::error(
            "DELETE component needs a targetId.",
        )));
        return;
    };
    for window in state.windows.iter_mut() {
        let before = window.components.len();
        window.components.retain(|c| c.id != target_id);
        if window.components.len() != before {
            dirty.windows = true;
        }
    }
}

fn copy_component(state: &mut DesktopState, command: &UiCommand) {
    let Some(source_id) = command.source_component_id.as_deref() else {
        return;
    };
    let mut captured = String::new();
    if let Some(window) = state.windows.window_of_component(source_id) {
        let component = window
            .components
            .iter()
            .find(|c| c.id == source_id);
        if let Some(component) = component {
            let is_calculator_display = window.kind == WindowKind::Calculator
                && component.role.as_deref() == Some("calculator-display");
            captured = if is_calculator_display {
                match &window.state {
                    WindowState::Calculator(calc) => calc.display_value.clone(),
                    _ => "0".to_string(),
                }
            } else {
                component
                    .value
                    .clone()
                    .or_else(|| component.text.clone())
                    .unwrap_or_default()
            };
        }
    }
    // An unresolved source still overwrites the slot with the empty string.
    state.clipboard = Some(captured);
}

fn paste_component(state: &mut DesktopState, command: &UiCommand, dirty: &mut DirtyFlags) {
    let Some(destination_id) = command.destination_component_id.as_deref() else {
        return;
    };
    let Some(clip) = state.clipboard.clone() else {
        return;
    };
    for window in state.windows.iter_mut() {
        for component in &mut window.components {
            if component.id == destination_id {
                let mut value = component.value.clone().unwrap_or_default();
                value.push_str(&clip);
                component.value = Some(value);
                dirty.windows = true;
            }
        }
    }
}
