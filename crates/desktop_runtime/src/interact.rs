//! Routing for direct user interactions: component activations, input value
//! changes, the deferred tic-tac-toe opponent turn, and async completions.

use app_calculator::{BinaryOp, CalcAction};
use app_secure_notes::{apply_note_action, edit_note_content, NoteAction};
use app_sound_mixer::SoundChannel;
use command_contract::{ComponentKind, UiRect};
use gamification::ProgressionEvent;
use rand::Rng;

use crate::engine::{DesktopState, DirtyFlags, Notice, RuntimeEffect};
use crate::model::{Component, WindowState};

const PASSWORD_INPUT_PREFIX: &str = "password-input-";
const NOTE_CONTENT_PREFIX: &str = "note-content-";
const VOLUME_SLIDER_PREFIX: &str = "volume-slider-";
const PROMPT_TEXTAREA_PREFIX: &str = "prompt-textarea-";
const WORKFLOW_TEXTAREA_PREFIX: &str = "workflow-textarea-";
const CODE_EDITOR_TEXTAREA_PREFIX: &str = "code-editor-textarea-";

fn push_events(events: Vec<ProgressionEvent>, effects: &mut Vec<RuntimeEffect>) {
    for event in events {
        effects.push(RuntimeEffect::Notify(Notice::info(event.message())));
    }
}

/// Handles a click on a component, dispatching on its `action` token.
///
/// The owning window is raised first. Components without a recognized action
/// fall back to forwarding their `prompt` to the assistant, if they carry one.
pub fn component_action(
    state: &mut DesktopState,
    window_id: &str,
    component_id: &str,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    let mut dirty = DirtyFlags::default();

    if state.windows.raise(window_id) {
        dirty.windows = true;
    }
    let Some(window) = state.windows.get(window_id) else {
        dirty.push_persist_effects(&mut effects);
        return effects;
    };
    let component = window.components.iter().find(|c| c.id == component_id);
    let action = component.and_then(|c| c.action.clone());
    let value = component.and_then(|c| c.value.clone());
    let prompt = component.and_then(|c| c.prompt.clone());

    match action.as_deref() {
        Some("timer:start") => timer_running(state, window_id, true, &mut dirty),
        Some("timer:stop") => timer_running(state, window_id, false, &mut dirty),
        Some("timer:reset") => {
            let duration = state
                .windows
                .get(window_id)
                .and_then(|w| w.timer_duration_seconds)
                .unwrap_or(0);
            if let Some(WindowState::Timer(timer)) = window_state_mut(state, window_id) {
                timer.timer_running = false;
                timer.time_remaining = duration;
                dirty.windows = true;
            }
        }
        Some("workflow:run") => {
            if let Some(WindowState::WorkflowAutomator(workflow)) =
                window_state_mut(state, window_id)
            {
                if !workflow.workflow_content.is_empty() {
                    effects.push(RuntimeEffect::ForwardToAssistant(format!(
                        "run the workflow:\n{}",
                        workflow.workflow_content
                    )));
                }
            }
        }
        Some("gamehub:open_chest") => {
            push_events(state.progression.open_loot_chest(), &mut effects);
            dirty.progression = true;
        }
        Some("image-generator:generate") => {
            if let Some(WindowState::ImageGenerator(gen)) = window_state_mut(state, window_id) {
                if !gen.prompt.is_empty() {
                    gen.is_generating_image = true;
                    gen.image_gen_error = None;
                    let prompt = gen.prompt.clone();
                    effects.push(RuntimeEffect::GenerateImage {
                        window_id: window_id.to_string(),
                        prompt,
                    });
                    dirty.windows = true;
                }
            }
        }
        Some(token) if token.starts_with("calculator:") => {
            if let Some(calc_action) = calculator_action(token, value.as_deref()) {
                if let Some(WindowState::Calculator(calc)) = window_state_mut(state, window_id) {
                    calc.apply(calc_action);
                    dirty.windows = true;
                }
            }
        }
        Some("tictactoe:move") => {
            let cell = value.as_deref().and_then(|v| v.trim().parse::<usize>().ok());
            if let (Some(cell), Some(WindowState::TicTacToe(game))) =
                (cell, window_state_mut(state, window_id))
            {
                if game.is_human_turn() && game.apply_move(cell) {
                    dirty.windows = true;
                    if !game.is_game_over {
                        effects.push(RuntimeEffect::ScheduleOpponentMove {
                            window_id: window_id.to_string(),
                        });
                    }
                }
            }
        }
        Some("sound-mixer:toggle") => {
            let channel = value.as_deref().and_then(SoundChannel::from_token);
            if let (Some(channel), Some(WindowState::SoundMixer(mixer))) =
                (channel, window_state_mut(state, window_id))
            {
                mixer.toggle(channel);
                dirty.windows = true;
            }
        }
        Some(token) if token.starts_with("encrypted-note:") => {
            note_action(state, window_id, token, &mut dirty);
        }
        Some("secure-photo:save") => {
            secure_photo_save(state, window_id, &mut effects, &mut dirty);
        }
        _ => {
            if let Some(prompt) = prompt {
                effects.push(RuntimeEffect::ForwardToAssistant(prompt));
            }
        }
    }

    dirty.push_persist_effects(&mut effects);
    effects
}

fn window_state_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &str,
) -> Option<&'a mut WindowState> {
    state.windows.get_mut(window_id).map(|w| &mut w.state)
}

fn timer_running(state: &mut DesktopState, window_id: &str, running: bool, dirty: &mut DirtyFlags) {
    if let Some(WindowState::Timer(timer)) = window_state_mut(state, window_id) {
        timer.timer_running = running;
        dirty.windows = true;
    }
}

fn calculator_action(token: &str, value: Option<&str>) -> Option<CalcAction> {
    match token {
        "calculator:digit" => value
            .and_then(|v| v.chars().next())
            .filter(char::is_ascii_digit)
            .map(CalcAction::Digit),
        "calculator:decimal" => Some(CalcAction::Decimal),
        "calculator:operator" => value
            .and_then(BinaryOp::from_symbol)
            .map(CalcAction::Operator),
        "calculator:equals" => Some(CalcAction::Equals),
        "calculator:clear" => Some(CalcAction::Clear),
        _ => None,
    }
}

fn note_action(state: &mut DesktopState, window_id: &str, token: &str, dirty: &mut DirtyFlags) {
    let Some(action) = NoteAction::from_token(token) else {
        return;
    };
    let Some(window) = state.windows.get(window_id) else {
        return;
    };
    let Some(note_id) = window.note_id.clone() else {
        return;
    };
    let WindowState::EncryptedNote(session) = &window.state else {
        return;
    };
    let attempt = session.password_attempt.clone();

    let result = apply_note_action(&mut state.vault, &note_id, action, &attempt);
    if let Some(WindowState::EncryptedNote(session)) = window_state_mut(state, window_id) {
        match result {
            Ok(()) => {
                session.password_attempt.clear();
                session.error.clear();
                dirty.vault = true;
            }
            Err(err) => session.error = err.to_string(),
        }
        dirty.windows = true;
    }
}

fn secure_photo_save(
    state: &mut DesktopState,
    window_id: &str,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let Some(WindowState::SecurePhotoCreator(creator)) = window_state_mut(state, window_id) else {
        return;
    };
    let name = creator.note_name.clone();
    // Work on a copy so the vault can be borrowed alongside the creator.
    let mut creator = creator.clone();
    let result = creator.save_into(&mut state.vault);
    if let Some(WindowState::SecurePhotoCreator(live)) = window_state_mut(state, window_id) {
        *live = creator;
    }
    dirty.windows = true;

    match result {
        Ok(_item_id) => {
            state.windows.remove(window_id);
            effects.push(RuntimeEffect::Notify(Notice::info(format!(
                "Secure photo \"{name}\" created successfully."
            ))));
            dirty.vault = true;
        }
        Err(err) => {
            effects.push(RuntimeEffect::Notify(Notice::error(err.to_string())));
        }
    }
}

/// Handles an edit to an input-like component, routed by id convention.
///
/// Well-known id prefixes map onto window state; anything else falls back to
/// setting the matching component's `value`.
pub fn component_value_changed(
    state: &mut DesktopState,
    component_id: &str,
    new_value: &str,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    let mut dirty = DirtyFlags::default();

    if let Some(window_id) = component_id.strip_prefix(PASSWORD_INPUT_PREFIX) {
        let window_id = window_id.to_string();
        match window_state_mut(state, &window_id) {
            Some(WindowState::EncryptedNote(session)) => {
                session.password_attempt = new_value.to_string();
                session.error.clear();
                dirty.windows = true;
            }
            Some(WindowState::SecurePhotoCreator(creator)) => {
                creator.set_password_attempt(new_value);
                dirty.windows = true;
            }
            _ => {}
        }
    } else if let Some(window_id) = component_id.strip_prefix(NOTE_CONTENT_PREFIX) {
        note_content_edited(state, window_id, new_value, &mut effects, &mut dirty);
    } else if let Some(channel) = component_id.strip_prefix(VOLUME_SLIDER_PREFIX) {
        volume_changed(state, channel, new_value, &mut dirty);
    } else if let Some(window_id) = component_id.strip_prefix(PROMPT_TEXTAREA_PREFIX) {
        let window_id = window_id.to_string();
        if let Some(WindowState::ImageGenerator(gen)) = window_state_mut(state, &window_id) {
            gen.prompt = new_value.to_string();
            dirty.windows = true;
        }
    } else if let Some(window_id) = component_id.strip_prefix(WORKFLOW_TEXTAREA_PREFIX) {
        let window_id = window_id.to_string();
        if let Some(WindowState::WorkflowAutomator(workflow)) =
            window_state_mut(state, &window_id)
        {
            workflow.workflow_content = new_value.to_string();
            dirty.windows = true;
        }
    } else if let Some(window_id) = component_id.strip_prefix(CODE_EDITOR_TEXTAREA_PREFIX) {
        code_edited(
            state,
            &window_id.to_string(),
            component_id,
            new_value,
            &mut effects,
            &mut dirty,
        );
    } else {
        for window in state.windows.iter_mut() {
            for component in &mut window.components {
                if component.id == component_id {
                    component.value = Some(new_value.to_string());
                    dirty.windows = true;
                }
            }
        }
    }

    dirty.push_persist_effects(&mut effects);
    effects
}

fn note_content_edited(
    state: &mut DesktopState,
    window_id: &str,
    new_value: &str,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let Some(note_id) = state.windows.get(window_id).and_then(|w| w.note_id.clone()) else {
        return;
    };
    let Ok(words_added) = edit_note_content(&mut state.vault, &note_id, new_value) else {
        return;
    };
    dirty.vault = true;
    if words_added > 0 {
        push_events(state.progression.words_written(words_added), effects);
        dirty.progression = true;
    }
}

fn volume_changed(state: &mut DesktopState, channel: &str, new_value: &str, dirty: &mut DirtyFlags) {
    let Some(channel) = SoundChannel::from_token(channel) else {
        return;
    };
    let Ok(volume) = new_value.parse::<f64>() else {
        return;
    };
    if volume.is_nan() {
        return;
    }
    for window in state.windows.iter_mut() {
        if let WindowState::SoundMixer(mixer) = &mut window.state {
            mixer.set_volume(channel, volume);
            dirty.windows = true;
        }
    }
}

fn code_edited(
    state: &mut DesktopState,
    window_id: &str,
    component_id: &str,
    new_value: &str,
    effects: &mut Vec<RuntimeEffect>,
    dirty: &mut DirtyFlags,
) {
    let Some(window) = state.windows.get_mut(window_id) else {
        return;
    };
    // The editor textarea materializes on first keystroke.
    if !window.components.iter().any(|c| c.id == component_id) {
        window.components.push(Component {
            id: component_id.to_string(),
            kind: ComponentKind::Textarea,
            rect: Some(UiRect::new(0.0, 0.0, 100.0, 100.0)),
            text: None,
            placeholder: None,
            src: None,
            value: None,
            action: None,
            role: None,
            source: None,
            prompt: None,
            style: None,
        });
    }
    let component = window
        .components
        .iter_mut()
        .find(|c| c.id == component_id);
    let Some(component) = component else {
        return;
    };
    let old_lines = component.value.as_deref().unwrap_or("").split('\n').count();
    let new_lines = new_value.split('\n').count();
    component.value = Some(new_value.to_string());
    dirty.windows = true;

    if new_lines > old_lines {
        let added = (new_lines - old_lines) as u64;
        push_events(state.progression.lines_coded(added), effects);
        dirty.progression = true;
    }
}

/// Plays the opponent's deferred tic-tac-toe turn.
///
/// `suggestion` is the assistant's reply to the opponent prompt; unusable
/// suggestions fall back to a random empty cell. The turn is skipped when the
/// game ended or the turn passed back meanwhile.
pub fn resolve_opponent_move<R: Rng>(
    state: &mut DesktopState,
    window_id: &str,
    suggestion: Option<&str>,
    rng: &mut R,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    let mut dirty = DirtyFlags::default();

    if let Some(WindowState::TicTacToe(game)) = window_state_mut(state, window_id) {
        if !game.is_game_over && game.current_player == game.ai_mark {
            if let Some(cell) = game.resolve_opponent_cell(suggestion, rng) {
                game.apply_move(cell);
                dirty.windows = true;
            }
        }
    }

    dirty.push_persist_effects(&mut effects);
    effects
}

/// Builds the opponent prompt for a scheduled tic-tac-toe turn.
pub fn opponent_prompt(state: &DesktopState, window_id: &str) -> Option<String> {
    match &state.windows.get(window_id)?.state {
        WindowState::TicTacToe(game) => Some(game.opponent_prompt()),
        _ => None,
    }
}

/// Completes an in-flight image generation for an image-generator window.
pub fn image_generated(
    state: &mut DesktopState,
    window_id: &str,
    result: Result<String, String>,
) -> Vec<RuntimeEffect> {
    let mut effects = Vec::new();
    let mut dirty = DirtyFlags::default();

    if let Some(WindowState::ImageGenerator(gen)) = window_state_mut(state, window_id) {
        gen.is_generating_image = false;
        match result {
            Ok(data_uri) => {
                gen.generated_image = Some(data_uri);
                gen.image_gen_error = None;
            }
            Err(message) => gen.image_gen_error = Some(message),
        }
        dirty.windows = true;
    }

    dirty.push_persist_effects(&mut effects);
    effects
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::RecordingMediaCaptureService;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    use crate::engine::apply_commands;

    use super::*;

    fn state_with(raw: serde_json::Value) -> DesktopState {
        let mut state = DesktopState::default();
        let media = RecordingMediaCaptureService::default();
        let command = serde_json::from_value(raw).expect("command");
        block_on(apply_commands(&mut state, &[command], &media));
        state
    }

    fn calculator_state() -> DesktopState {
        state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": {
                "id": "calc",
                "windowType": "calculator",
                "components": [
                    { "id": "seven", "type": "button", "action": "calculator:digit", "value": "7" },
                    { "id": "plus", "type": "button", "action": "calculator:operator", "value": "+" },
                    { "id": "eq", "type": "button", "action": "calculator:equals" }
                ]
            }
        }))
    }

    #[test]
    fn calculator_buttons_drive_the_state_machine() {
        let mut state = calculator_state();
        component_action(&mut state, "calc", "seven");
        component_action(&mut state, "calc", "plus");
        component_action(&mut state, "calc", "seven");
        component_action(&mut state, "calc", "eq");

        let WindowState::Calculator(calc) = &state.windows.get("calc").expect("window").state
        else {
            panic!("expected calculator state");
        };
        assert_eq!(calc.display_value, "14");
    }

    #[test]
    fn component_action_raises_the_window() {
        let mut state = calculator_state();
        let media = RecordingMediaCaptureService::default();
        let create = serde_json::from_value(json!({
            "action": "CREATE", "elementType": "window",
            "spec": { "id": "b1", "windowType": "browser" }
        }))
        .expect("command");
        block_on(apply_commands(&mut state, &[create], &media));
        let front = state.windows.get("b1").expect("window").z_index;
        assert!(front > state.windows.get("calc").expect("window").z_index);

        component_action(&mut state, "calc", "seven");
        assert!(state.windows.get("calc").expect("window").z_index > front);
    }

    #[test]
    fn human_move_schedules_the_opponent() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": {
                "id": "ttt",
                "windowType": "tic-tac-toe",
                "components": [
                    { "id": "cell4", "type": "button", "action": "tictactoe:move", "value": "4" }
                ]
            }
        }));
        let effects = component_action(&mut state, "ttt", "cell4");
        assert!(effects.contains(&RuntimeEffect::ScheduleOpponentMove {
            window_id: "ttt".to_string()
        }));

        // Not the human's turn anymore; a second click is ignored.
        let effects = component_action(&mut state, "ttt", "cell4");
        assert!(!effects
            .iter()
            .any(|e| matches!(e, RuntimeEffect::ScheduleOpponentMove { .. })));
    }

    #[test]
    fn opponent_turn_plays_exactly_one_mark() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": {
                "id": "ttt",
                "windowType": "tic-tac-toe",
                "components": [
                    { "id": "cell4", "type": "button", "action": "tictactoe:move", "value": "4" }
                ]
            }
        }));
        component_action(&mut state, "ttt", "cell4");

        let mut rng = StdRng::seed_from_u64(1);
        resolve_opponent_move(&mut state, "ttt", Some("0"), &mut rng);
        let WindowState::TicTacToe(game) = &state.windows.get("ttt").expect("window").state
        else {
            panic!("expected game state");
        };
        assert_eq!(game.board.iter().filter(|c| c.is_some()).count(), 2);
        assert!(game.is_human_turn());

        // Turn already passed back; a stray resolution does nothing.
        resolve_opponent_move(&mut state, "ttt", Some("1"), &mut rng);
        let WindowState::TicTacToe(game) = &state.windows.get("ttt").expect("window").state
        else {
            panic!("expected game state");
        };
        assert_eq!(game.board.iter().filter(|c| c.is_some()).count(), 2);
    }

    #[test]
    fn note_unlock_round_trip_through_the_window() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": { "windowType": "encrypted-note", "noteName": "Journal" }
        }));
        let window_id = state.windows.iter().next().expect("window").id.clone();
        let note_id = state
            .windows
            .get(&window_id)
            .expect("window")
            .note_id
            .clone()
            .expect("note id");
        let unlock_id = format!("unlock-{window_id}");
        if let Some(window) = state.windows.get_mut(&window_id) {
            window.components.push(Component {
                id: unlock_id.clone(),
                kind: ComponentKind::Button,
                rect: None,
                text: None,
                placeholder: None,
                src: None,
                value: None,
                action: Some("encrypted-note:unlock".to_string()),
                role: None,
                source: None,
                prompt: None,
                style: None,
            });
        }

        component_value_changed(&mut state, &format!("password-input-{window_id}"), "pw");
        component_action(&mut state, &window_id, &unlock_id);

        let item = state.vault.find_by_id(&note_id).expect("item");
        assert!(!item.is_locked);
        let WindowState::EncryptedNote(session) =
            &state.windows.get(&window_id).expect("window").state
        else {
            panic!("expected note state");
        };
        assert_eq!(session.password_attempt, "");
        assert_eq!(session.error, "");
    }

    #[test]
    fn wrong_note_password_surfaces_in_the_window() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": { "windowType": "encrypted-note", "noteName": "Journal" }
        }));
        let window_id = state.windows.iter().next().expect("window").id.clone();
        let note_id = state
            .windows
            .get(&window_id)
            .expect("window")
            .note_id
            .clone()
            .expect("note id");
        apply_note_action(&mut state.vault, &note_id, NoteAction::SetPassword, "right")
            .expect("provision");
        apply_note_action(&mut state.vault, &note_id, NoteAction::Lock, "").expect("lock");
        let unlock_id = format!("unlock-{window_id}");
        if let Some(window) = state.windows.get_mut(&window_id) {
            window.components.push(Component {
                id: unlock_id.clone(),
                kind: ComponentKind::Button,
                rect: None,
                text: None,
                placeholder: None,
                src: None,
                value: None,
                action: Some("encrypted-note:unlock".to_string()),
                role: None,
                source: None,
                prompt: None,
                style: None,
            });
        }

        component_value_changed(&mut state, &format!("password-input-{window_id}"), "wrong");
        component_action(&mut state, &window_id, &unlock_id);

        let WindowState::EncryptedNote(session) =
            &state.windows.get(&window_id).expect("window").state
        else {
            panic!("expected note state");
        };
        assert_eq!(session.error, "Incorrect password.");
        assert!(state.vault.find_by_id(&note_id).expect("item").is_locked);
    }

    #[test]
    fn note_edits_award_word_xp() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": { "windowType": "encrypted-note", "noteName": "Journal" }
        }));
        let window_id = state.windows.iter().next().expect("window").id.clone();
        let note_id = state
            .windows
            .get(&window_id)
            .expect("window")
            .note_id
            .clone()
            .expect("note id");
        apply_note_action(&mut state.vault, &note_id, NoteAction::Unlock, "pw").expect("unlock");

        component_value_changed(
            &mut state,
            &format!("note-content-{window_id}"),
            "five words typed right here",
        );
        assert_eq!(state.progression.state.xp, 1.0);
    }

    #[test]
    fn code_editor_textarea_materializes_and_counts_lines() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": { "id": "ed", "windowType": "code-editor" }
        }));
        let textarea_id = "code-editor-textarea-ed";
        component_value_changed(&mut state, textarea_id, "fn main() {}");
        let window = state.windows.get("ed").expect("window");
        assert_eq!(window.components.len(), 1);
        assert_eq!(window.components[0].kind, ComponentKind::Textarea);
        assert_eq!(state.progression.state.lines_of_code_written, 0);

        component_value_changed(&mut state, textarea_id, "fn main() {}\nfn helper() {}\n// x");
        assert_eq!(state.progression.state.lines_of_code_written, 2);
        assert_eq!(state.progression.state.xp, 4.0);
    }

    #[test]
    fn volume_slider_routes_to_every_mixer_window() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": { "id": "mix", "windowType": "sound-mixer" }
        }));
        component_value_changed(&mut state, "volume-slider-rain", "0.9");
        let WindowState::SoundMixer(mixer) = &state.windows.get("mix").expect("window").state
        else {
            panic!("expected mixer state");
        };
        assert_eq!(mixer.sounds.rain.volume, 0.9);

        // Garbage values are dropped.
        component_value_changed(&mut state, "volume-slider-rain", "loud");
        let WindowState::SoundMixer(mixer) = &state.windows.get("mix").expect("window").state
        else {
            panic!("expected mixer state");
        };
        assert_eq!(mixer.sounds.rain.volume, 0.9);
    }

    #[test]
    fn generate_requires_a_prompt_and_marks_the_window_busy() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": {
                "id": "img",
                "windowType": "image-generator",
                "components": [
                    { "id": "go", "type": "button", "action": "image-generator:generate" }
                ]
            }
        }));
        let effects = component_action(&mut state, "img", "go");
        assert!(!effects
            .iter()
            .any(|e| matches!(e, RuntimeEffect::GenerateImage { .. })));

        component_value_changed(&mut state, "prompt-textarea-img", "a fox in a library");
        let effects = component_action(&mut state, "img", "go");
        assert!(effects.contains(&RuntimeEffect::GenerateImage {
            window_id: "img".to_string(),
            prompt: "a fox in a library".to_string(),
        }));
        let WindowState::ImageGenerator(gen) = &state.windows.get("img").expect("window").state
        else {
            panic!("expected generator state");
        };
        assert!(gen.is_generating_image);
    }

    #[test]
    fn image_completion_clears_the_busy_flag_either_way() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": { "id": "img", "windowType": "image-generator" }
        }));
        image_generated(&mut state, "img", Ok("data:image/png;base64,x".to_string()));
        let WindowState::ImageGenerator(gen) = &state.windows.get("img").expect("window").state
        else {
            panic!("expected generator state");
        };
        assert_eq!(gen.generated_image.as_deref(), Some("data:image/png;base64,x"));
        assert!(!gen.is_generating_image);

        image_generated(&mut state, "img", Err("model unavailable".to_string()));
        let WindowState::ImageGenerator(gen) = &state.windows.get("img").expect("window").state
        else {
            panic!("expected generator state");
        };
        assert_eq!(gen.image_gen_error.as_deref(), Some("model unavailable"));
    }

    #[test]
    fn workflow_run_forwards_the_content_as_a_prompt() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": {
                "id": "wf",
                "windowType": "workflow-automator",
                "components": [
                    { "id": "run", "type": "button", "action": "workflow:run" }
                ]
            }
        }));
        // Empty workflows are not forwarded.
        let effects = component_action(&mut state, "wf", "run");
        assert!(!effects
            .iter()
            .any(|e| matches!(e, RuntimeEffect::ForwardToAssistant(_))));

        component_value_changed(&mut state, "workflow-textarea-wf", "open a browser");
        let effects = component_action(&mut state, "wf", "run");
        assert!(effects.contains(&RuntimeEffect::ForwardToAssistant(
            "run the workflow:\nopen a browser".to_string()
        )));
    }

    #[test]
    fn chest_button_opens_a_chest() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": {
                "windowType": "game-hub",
                "components": []
            }
        }));
        state.progression.state.unopened_loot_chests = 1;
        if let Some(window) = state.windows.get_mut("game-hub-main") {
            window.components.push(Component {
                id: "chest".to_string(),
                kind: ComponentKind::Button,
                rect: None,
                text: None,
                placeholder: None,
                src: None,
                value: None,
                action: Some("gamehub:open_chest".to_string()),
                role: None,
                source: None,
                prompt: None,
                style: None,
            });
        }
        let effects = component_action(&mut state, "game-hub-main", "chest");
        assert_eq!(state.progression.state.unopened_loot_chests, 0);
        assert!(effects.iter().any(|e| matches!(
            e,
            RuntimeEffect::Notify(notice)
                if notice.text == "You opened a loot chest and found a new AI wallpaper!"
        )));
    }

    #[test]
    fn prompt_components_forward_to_the_assistant() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": {
                "id": "dash",
                "windowType": "whiteboard",
                "components": [
                    { "id": "help", "type": "button", "prompt": "draw me a map" }
                ]
            }
        }));
        let effects = component_action(&mut state, "dash", "help");
        assert!(effects.contains(&RuntimeEffect::ForwardToAssistant(
            "draw me a map".to_string()
        )));
    }

    #[test]
    fn photo_save_moves_the_image_into_the_vault_and_closes_the_window() {
        let mut state = state_with(json!({
            "action": "CREATE",
            "elementType": "window",
            "spec": {
                "windowType": "secure-photo-creator",
                "internalState": { "noteName": "Trip" }
            }
        }));
        let window_id = state.windows.iter().next().expect("window").id.clone();
        if let Some(WindowState::SecurePhotoCreator(creator)) =
            state.windows.get_mut(&window_id).map(|w| &mut w.state)
        {
            creator
                .attach_image("data:image/png;base64,abc", "image/png", 512)
                .expect("attach");
        }
        if let Some(window) = state.windows.get_mut(&window_id) {
            window.components.push(Component {
                id: "save".to_string(),
                kind: ComponentKind::Button,
                rect: None,
                text: None,
                placeholder: None,
                src: None,
                value: None,
                action: Some("secure-photo:save".to_string()),
                role: None,
                source: None,
                prompt: None,
                style: None,
            });
        }
        component_value_changed(&mut state, &format!("password-input-{window_id}"), "pw");
        let effects = component_action(&mut state, &window_id, "save");

        assert!(state.windows.get(&window_id).is_none());
        let item = state.vault.find_by_name("Trip").expect("item");
        assert!(item.is_locked);
        assert!(effects.iter().any(|e| matches!(
            e,
            RuntimeEffect::Notify(notice)
                if notice.text == "Secure photo \"Trip\" created successfully."
        )));
    }
}
