//! Window and component model with typed per-kind internal state.

use app_calculator::{BinaryOp, CalculatorState};
use app_secure_notes::PhotoCreatorState;
use app_sound_mixer::{SoundMixerState, Sounds};
use app_tic_tac_toe::{Mark, TicTacToeState, Winner};
use command_contract::{ComponentKind, ComponentSpec, MediaSource, UiRect};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Closed set of window kinds the engine knows how to host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowKind {
    /// Countdown timer.
    Timer,
    /// Calculator.
    Calculator,
    /// Code editor.
    CodeEditor,
    /// Tic-tac-toe board.
    TicTacToe,
    /// Activity log viewer.
    ActivityLog,
    /// Embedded browser.
    Browser,
    /// Focus session (timer with a scene).
    FocusMode,
    /// Ambient sound mixer.
    SoundMixer,
    /// Encrypted note session.
    EncryptedNote,
    /// Prompt-driven image generator.
    ImageGenerator,
    /// Text translator.
    Translator,
    /// Drawing whiteboard.
    Whiteboard,
    /// File cabinet search.
    FileCabinet,
    /// Workflow automation editor.
    WorkflowAutomator,
    /// Game hub singleton.
    GameHub,
    /// System dashboard singleton.
    Dashboard,
    /// App launcher singleton.
    AppLauncher,
    /// Secure photo creator.
    SecurePhotoCreator,
}

impl WindowKind {
    /// Parses a wire token such as `tic-tac-toe`.
    pub fn from_token(token: &str) -> Option<Self> {
        serde_json::from_value(Value::String(token.to_string())).ok()
    }

    /// Returns the wire token for this kind.
    pub fn as_token(self) -> String {
        match serde_json::to_value(self) {
            Ok(Value::String(token)) => token,
            _ => String::new(),
        }
    }

    /// Default window title: the token with its first letter upper-cased and
    /// dashes replaced by spaces.
    pub fn default_title(self) -> String {
        let token = self.as_token().replace('-', " ");
        let mut chars = token.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => token,
        }
    }

    /// Whether this kind runs the countdown tick.
    pub fn is_timer_like(self) -> bool {
        matches!(self, Self::Timer | Self::FocusMode)
    }
}

/// One component inside a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// Stable component identifier.
    pub id: String,
    /// Component class.
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Sub-rect within the owning window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<UiRect>,
    /// Display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Input placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Image/iframe source URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Current value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Namespaced interaction token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    /// Semantic role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Capture source for live views.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<MediaSource>,
    /// Assistant prompt dispatched on activation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Free-form style hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

impl Component {
    /// Builds a component from a creation spec, generating an id and
    /// defaulting the kind to a label when absent.
    pub fn from_spec(spec: &ComponentSpec) -> Self {
        Self {
            id: spec
                .id
                .clone()
                .unwrap_or_else(|| format!("component-{}", Uuid::new_v4())),
            kind: spec.kind.unwrap_or(ComponentKind::Label),
            rect: spec.rect,
            text: spec.text.clone(),
            placeholder: spec.placeholder.clone(),
            src: spec.src.clone(),
            value: spec.value.clone(),
            action: spec.action.clone(),
            role: spec.role.clone(),
            source: spec.source,
            prompt: spec.prompt.clone(),
            style: spec.style.clone(),
        }
    }

    /// Shallow-merges an update spec: present fields replace, absent fields
    /// stay.
    pub fn merge_spec(&mut self, spec: &ComponentSpec) {
        if let Some(kind) = spec.kind {
            self.kind = kind;
        }
        if let Some(rect) = spec.rect {
            self.rect = Some(rect);
        }
        if let Some(text) = &spec.text {
            self.text = Some(text.clone());
        }
        if let Some(placeholder) = &spec.placeholder {
            self.placeholder = Some(placeholder.clone());
        }
        if let Some(src) = &spec.src {
            self.src = Some(src.clone());
        }
        if let Some(value) = &spec.value {
            self.value = Some(value.clone());
        }
        if let Some(action) = &spec.action {
            self.action = Some(action.clone());
        }
        if let Some(role) = &spec.role {
            self.role = Some(role.clone());
        }
        if let Some(source) = spec.source {
            self.source = Some(source);
        }
        if let Some(prompt) = &spec.prompt {
            self.prompt = Some(prompt.clone());
        }
        if let Some(style) = &spec.style {
            self.style = Some(style.clone());
        }
    }
}

/// Countdown state shared by timer and focus-mode windows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    /// Seconds left on the countdown.
    pub time_remaining: u64,
    /// Whether the countdown is ticking.
    pub timer_running: bool,
    /// Focus scene identifier, focus-mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
}

/// Encrypted-note window session state. Plaintext never lives here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteWindowState {
    /// Password currently being typed.
    pub password_attempt: String,
    /// Window-scoped error line.
    pub error: String,
}

/// Image-generator window state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGeneratorState {
    /// Prompt text.
    pub prompt: String,
    /// Last generated image as a data URI.
    pub generated_image: Option<String>,
    /// Whether a generation call is in flight.
    pub is_generating_image: bool,
    /// Error from the last failed generation.
    pub image_gen_error: Option<String>,
}

/// Translator window state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatorState {
    /// Source language code.
    pub from_lang: String,
    /// Target language code.
    pub to_lang: String,
    /// Text to translate.
    pub input_text: String,
    /// Last translation result.
    pub translated_text: String,
    /// Whether a translation call is in flight.
    pub is_translating: bool,
}

impl Default for TranslatorState {
    fn default() -> Self {
        Self {
            from_lang: "en".to_string(),
            to_lang: "es".to_string(),
            input_text: String::new(),
            translated_text: String::new(),
            is_translating: false,
        }
    }
}

/// Whiteboard window state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhiteboardState {
    /// Current drawing as SVG markup.
    pub svg_content: String,
    /// Whether an SVG generation call is in flight.
    pub is_generating_svg: bool,
}

/// File-cabinet window state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCabinetState {
    /// Search results.
    pub files: Vec<Value>,
    /// Current search term.
    pub search_term: String,
    /// Whether a search call is in flight.
    pub is_searching_files: bool,
}

/// Workflow-automator window state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    /// Workflow description text.
    pub workflow_content: String,
}

/// Browser window state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserState {
    /// Current page URL.
    pub browser_url: String,
}

impl Default for BrowserState {
    fn default() -> Self {
        Self {
            browser_url: "https://www.google.com/search?igu=1&q=welcome+to+aria+os".to_string(),
        }
    }
}

/// Game-hub window state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameHubState {
    /// Selected hub tab.
    pub active_tab: String,
}

impl Default for GameHubState {
    fn default() -> Self {
        Self {
            active_tab: "dashboard".to_string(),
        }
    }
}

/// App-launcher window state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppLauncherState {
    /// Launcher filter text.
    pub search_term: String,
}

/// Typed internal state, one variant per window kind.
///
/// Kinds with no internal state (code editor, activity log, dashboard) carry
/// empty variants so the set stays closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WindowState {
    /// Countdown state for timer and focus-mode windows.
    Timer(TimerState),
    /// Calculator state.
    Calculator(CalculatorState),
    /// Code editor; content lives in its textarea component.
    CodeEditor,
    /// Tic-tac-toe state.
    TicTacToe(TicTacToeState),
    /// Activity log; content is rendered from notifications.
    ActivityLog,
    /// Browser state.
    Browser(BrowserState),
    /// Sound-mixer state.
    SoundMixer(SoundMixerState),
    /// Encrypted-note session state.
    EncryptedNote(NoteWindowState),
    /// Image-generator state.
    ImageGenerator(ImageGeneratorState),
    /// Translator state.
    Translator(TranslatorState),
    /// Whiteboard state.
    Whiteboard(WhiteboardState),
    /// File-cabinet state.
    FileCabinet(FileCabinetState),
    /// Workflow-automator state.
    WorkflowAutomator(WorkflowState),
    /// Game-hub state.
    GameHub(GameHubState),
    /// Dashboard has no internal state.
    Dashboard,
    /// App-launcher state.
    AppLauncher(AppLauncherState),
    /// Secure-photo creator state.
    SecurePhotoCreator(PhotoCreatorState),
}

/// One-level-deep state patches, deserialized from an UPDATE command's
/// `internalState` object. Absent keys leave fields untouched; explicit
/// `null` clears nullable fields.
mod patch {
    use super::*;

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TimerPatch {
        pub time_remaining: Option<u64>,
        pub timer_running: Option<bool>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub scene_id: Option<Option<String>>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CalculatorPatch {
        pub display_value: Option<String>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub previous_value: Option<Option<f64>>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub operator: Option<Option<BinaryOp>>,
        pub waiting_for_operand: Option<bool>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TicTacToePatch {
        pub board: Option<[Option<Mark>; 9]>,
        pub player_mark: Option<Mark>,
        pub ai_mark: Option<Mark>,
        pub current_player: Option<Mark>,
        pub is_game_over: Option<bool>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub winner: Option<Option<Winner>>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BrowserPatch {
        pub browser_url: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SoundMixerPatch {
        pub sounds: Option<Sounds>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NotePatch {
        pub password_attempt: Option<String>,
        pub error: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ImageGeneratorPatch {
        pub prompt: Option<String>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub generated_image: Option<Option<String>>,
        pub is_generating_image: Option<bool>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub image_gen_error: Option<Option<String>>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TranslatorPatch {
        pub from_lang: Option<String>,
        pub to_lang: Option<String>,
        pub input_text: Option<String>,
        pub translated_text: Option<String>,
        pub is_translating: Option<bool>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WhiteboardPatch {
        pub svg_content: Option<String>,
        pub is_generating_svg: Option<bool>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FileCabinetPatch {
        pub files: Option<Vec<Value>>,
        pub search_term: Option<String>,
        pub is_searching_files: Option<bool>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WorkflowPatch {
        pub workflow_content: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GameHubPatch {
        pub active_tab: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct AppLauncherPatch {
        pub search_term: Option<String>,
    }

    #[derive(Debug, Default, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PhotoCreatorPatch {
        pub status: Option<app_secure_notes::PhotoCreatorPhase>,
        pub note_name: Option<String>,
        pub password_attempt: Option<String>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub error: Option<Option<String>>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub image_preview_url: Option<Option<String>>,
        #[serde(default, deserialize_with = "super::double_option")]
        pub image_data: Option<Option<String>>,
    }
}

/// Distinguishes an absent key from an explicit `null`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

macro_rules! patch_field {
    ($state:expr, $patch:expr, $($field:ident),+ $(,)?) => {
        $(if let Some(value) = $patch.$field {
            $state.$field = value;
        })+
    };
}

impl WindowState {
    /// Default state for a freshly created window of `kind`.
    pub fn default_for(kind: WindowKind) -> Self {
        match kind {
            WindowKind::Timer | WindowKind::FocusMode => Self::Timer(TimerState::default()),
            WindowKind::Calculator => Self::Calculator(CalculatorState::default()),
            WindowKind::CodeEditor => Self::CodeEditor,
            WindowKind::TicTacToe => Self::TicTacToe(TicTacToeState::default()),
            WindowKind::ActivityLog => Self::ActivityLog,
            WindowKind::Browser => Self::Browser(BrowserState::default()),
            WindowKind::SoundMixer => Self::SoundMixer(SoundMixerState::default()),
            WindowKind::EncryptedNote => Self::EncryptedNote(NoteWindowState::default()),
            WindowKind::ImageGenerator => Self::ImageGenerator(ImageGeneratorState::default()),
            WindowKind::Translator => Self::Translator(TranslatorState::default()),
            WindowKind::Whiteboard => Self::Whiteboard(WhiteboardState::default()),
            WindowKind::FileCabinet => Self::FileCabinet(FileCabinetState::default()),
            WindowKind::WorkflowAutomator => Self::WorkflowAutomator(WorkflowState::default()),
            WindowKind::GameHub => Self::GameHub(GameHubState::default()),
            WindowKind::Dashboard => Self::Dashboard,
            WindowKind::AppLauncher => Self::AppLauncher(AppLauncherState::default()),
            WindowKind::SecurePhotoCreator => {
                Self::SecurePhotoCreator(PhotoCreatorState::new("New Secure Photo"))
            }
        }
    }

    /// Applies a one-level-deep patch object to this state.
    ///
    /// # Errors
    ///
    /// Returns the deserializer error when the patch is not an object or a
    /// field has the wrong shape; the state is unchanged in that case.
    pub fn apply_patch(&mut self, raw: &Value) -> Result<(), serde_json::Error> {
        match self {
            Self::Timer(state) => {
                let p: patch::TimerPatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, time_remaining, timer_running, scene_id);
            }
            Self::Calculator(state) => {
                let p: patch::CalculatorPatch = serde_json::from_value(raw.clone())?;
                patch_field!(
                    state,
                    p,
                    display_value,
                    previous_value,
                    operator,
                    waiting_for_operand
                );
            }
            Self::TicTacToe(state) => {
                let p: patch::TicTacToePatch = serde_json::from_value(raw.clone())?;
                patch_field!(
                    state,
                    p,
                    board,
                    player_mark,
                    ai_mark,
                    current_player,
                    is_game_over,
                    winner
                );
            }
            Self::Browser(state) => {
                let p: patch::BrowserPatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, browser_url);
            }
            Self::SoundMixer(state) => {
                let p: patch::SoundMixerPatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, sounds);
            }
            Self::EncryptedNote(state) => {
                let p: patch::NotePatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, password_attempt, error);
            }
            Self::ImageGenerator(state) => {
                let p: patch::ImageGeneratorPatch = serde_json::from_value(raw.clone())?;
                patch_field!(
                    state,
                    p,
                    prompt,
                    generated_image,
                    is_generating_image,
                    image_gen_error
                );
            }
            Self::Translator(state) => {
                let p: patch::TranslatorPatch = serde_json::from_value(raw.clone())?;
                patch_field!(
                    state,
                    p,
                    from_lang,
                    to_lang,
                    input_text,
                    translated_text,
                    is_translating
                );
            }
            Self::Whiteboard(state) => {
                let p: patch::WhiteboardPatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, svg_content, is_generating_svg);
            }
            Self::FileCabinet(state) => {
                let p: patch::FileCabinetPatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, files, search_term, is_searching_files);
            }
            Self::WorkflowAutomator(state) => {
                let p: patch::WorkflowPatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, workflow_content);
            }
            Self::GameHub(state) => {
                let p: patch::GameHubPatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, active_tab);
            }
            Self::AppLauncher(state) => {
                let p: patch::AppLauncherPatch = serde_json::from_value(raw.clone())?;
                patch_field!(state, p, search_term);
            }
            Self::SecurePhotoCreator(state) => {
                let p: patch::PhotoCreatorPatch = serde_json::from_value(raw.clone())?;
                patch_field!(
                    state,
                    p,
                    status,
                    note_name,
                    password_attempt,
                    error,
                    image_preview_url,
                    image_data
                );
            }
            Self::CodeEditor | Self::ActivityLog | Self::Dashboard => {
                // Stateless kinds still validate that the patch is an object.
                let _: serde_json::Map<String, Value> = serde_json::from_value(raw.clone())?;
            }
        }
        Ok(())
    }
}

/// One window on the workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRecord {
    /// Stable window identifier.
    pub id: String,
    /// Title-bar text.
    pub title: String,
    /// Geometry in percent coordinates.
    pub rect: UiRect,
    /// Stacking position; higher is frontmost.
    pub z_index: u64,
    /// Hidden windows keep their full state but are not rendered.
    pub is_hidden: bool,
    /// Window kind.
    #[serde(rename = "windowType")]
    pub kind: WindowKind,
    /// Generic component tree.
    pub components: Vec<Component>,
    /// Vault item id backing an encrypted-note window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_id: Option<String>,
    /// Vault item name backing an encrypted-note window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note_name: Option<String>,
    /// Configured countdown length for timer-like windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timer_duration_seconds: Option<u64>,
    /// Typed internal state.
    #[serde(rename = "internalState")]
    pub state: WindowState,
}

impl WindowRecord {
    /// Whether any component of this window is a live view.
    pub fn has_live_view(&self) -> bool {
        self.components
            .iter()
            .any(|c| c.kind == ComponentKind::LiveView)
    }
}

/// Insertion-ordered window collection with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowCollection {
    windows: Vec<WindowRecord>,
}

impl WindowCollection {
    /// Windows in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &WindowRecord> {
        self.windows.iter()
    }

    /// Mutable iteration in insertion order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut WindowRecord> {
        self.windows.iter_mut()
    }

    /// Number of windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether the workspace is empty.
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Looks a window up by id.
    pub fn get(&self, id: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// Highest z-index currently in use.
    pub fn max_z(&self) -> u64 {
        self.windows.iter().map(|w| w.z_index).max().unwrap_or(0)
    }

    /// Inserts a window, replacing any existing window with the same id.
    pub fn insert_or_replace(&mut self, window: WindowRecord) {
        self.windows.retain(|w| w.id != window.id);
        self.windows.push(window);
    }

    /// Removes a window by id.
    pub fn remove(&mut self, id: &str) -> Option<WindowRecord> {
        let index = self.windows.iter().position(|w| w.id == id)?;
        Some(self.windows.remove(index))
    }

    /// Reveals a window and raises it to the front.
    pub fn reveal_and_raise(&mut self, id: &str) -> bool {
        let next_z = self.max_z() + 1;
        match self.get_mut(id) {
            Some(window) => {
                window.is_hidden = false;
                window.z_index = next_z;
                true
            }
            None => false,
        }
    }

    /// Raises a window to the front without changing visibility.
    pub fn raise(&mut self, id: &str) -> bool {
        let next_z = self.max_z() + 1;
        match self.get_mut(id) {
            Some(window) => {
                window.z_index = next_z;
                true
            }
            None => false,
        }
    }

    /// Finds the window owning a component id.
    pub fn window_of_component(&self, component_id: &str) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .find(|w| w.components.iter().any(|c| c.id == component_id))
    }

    /// Finds the encrypted-note window bound to a vault item.
    pub fn window_for_note(&self, note_id: &str) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .find(|w| w.note_id.as_deref() == Some(note_id))
    }

    /// Whether any visible window still shows a live view.
    pub fn any_visible_live_view(&self) -> bool {
        self.windows
            .iter()
            .any(|w| !w.is_hidden && w.has_live_view())
    }
}
