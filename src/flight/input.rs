//! Keyboard and pointer input → [`FlightState`].
//!
//! ## Pipeline (runs in order every `Update` frame)
//!
//! 1. [`keyboard_input_system`] — press/release edges → `ActiveInputs`; the
//!    restart key writes a [`RestartFlight`] message.
//! 2. [`pointer_input_system`] — look-button drags → look controller.
//! 3. [`restart_system`] — consumes `RestartFlight`.
//!
//! Input runs asynchronously to the fixed tick: handlers write the state as
//! soon as the edge arrives, and the next tick reads whatever is current.

use std::collections::HashMap;

use super::look::pointer_sample;
use super::state::{ControlAction, FlightState, PointerSample};
use crate::config::FlightConfig;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

/// Request to put the body back at the origin, at rest, in `Free`.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct RestartFlight;

/// Mapping from physical keys to logical actions.
///
/// Replace the resource to rebind; several keys may share one action.
#[derive(Resource, Debug, Clone)]
pub struct KeyBindings {
    pub actions: HashMap<KeyCode, ControlAction>,
    /// Key that requests a [`RestartFlight`].
    pub restart: KeyCode,
    /// Mouse button that engages a look drag.
    pub look_button: MouseButton,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let actions = HashMap::from([
            (KeyCode::KeyW, ControlAction::ThrustForward),
            (KeyCode::KeyS, ControlAction::ThrustBack),
            (KeyCode::KeyA, ControlAction::ThrustLeft),
            (KeyCode::KeyD, ControlAction::ThrustRight),
            (KeyCode::Space, ControlAction::ThrustUp),
            (KeyCode::ControlLeft, ControlAction::ThrustDown),
            (KeyCode::KeyQ, ControlAction::RollLeft),
            (KeyCode::KeyE, ControlAction::RollRight),
            (KeyCode::KeyX, ControlAction::Brake),
        ]);
        Self {
            actions,
            restart: KeyCode::KeyR,
            look_button: MouseButton::Left,
        }
    }
}

impl KeyBindings {
    #[inline]
    pub fn action(&self, key: KeyCode) -> Option<ControlAction> {
        self.actions.get(&key).copied()
    }

    /// All keys bound to `action`.
    pub fn keys_for(&self, action: ControlAction) -> impl Iterator<Item = KeyCode> + '_ {
        self.actions
            .iter()
            .filter(move |(_, bound)| **bound == action)
            .map(|(key, _)| *key)
    }
}

/// Translate key press/release edges into [`ActiveInputs`](super::state::ActiveInputs).
///
/// Releasing one of two keys bound to the same action keeps the action held
/// until the last of them is released.
pub fn keyboard_input_system(
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut q_body: Query<&mut FlightState>,
    mut restart: MessageWriter<RestartFlight>,
) {
    let Ok(mut state) = q_body.single_mut() else {
        return;
    };

    for key in keys.get_just_pressed() {
        if let Some(action) = bindings.action(*key) {
            state.inputs.press(action);
        } else if *key == bindings.restart {
            restart.write(RestartFlight);
        }
    }

    for key in keys.get_just_released() {
        let Some(action) = bindings.action(*key) else {
            continue;
        };
        if !bindings.keys_for(action).any(|k| keys.pressed(k)) {
            state.inputs.release(action);
        }
    }
}

/// Turn look-button drags into pointer samples for the look controller.
///
/// The session starts at the cursor position on the press edge (or at the
/// first movement if the cursor position is unknown), so pressing never
/// produces a jump.
pub fn pointer_input_system(
    buttons: Res<ButtonInput<MouseButton>>,
    bindings: Res<KeyBindings>,
    mut cursor_moves: MessageReader<CursorMoved>,
    q_window: Query<&Window, With<PrimaryWindow>>,
    mut q_body: Query<&mut FlightState>,
    config: Res<FlightConfig>,
) {
    let Ok(mut state) = q_body.single_mut() else {
        cursor_moves.clear();
        return;
    };
    let sensitivity = config.look_sensitivity;

    if buttons.just_pressed(bindings.look_button) {
        let start = cursor_moves
            .read()
            .last()
            .map(|moved| moved.position)
            .or_else(|| q_window.single().ok().and_then(Window::cursor_position));
        state.drag = None;
        if let Some(position) = start {
            pointer_sample(
                &mut state,
                PointerSample {
                    engaged: true,
                    position,
                },
                sensitivity,
            );
        }
        return;
    }

    if buttons.pressed(bindings.look_button) {
        for moved in cursor_moves.read() {
            pointer_sample(
                &mut state,
                PointerSample {
                    engaged: true,
                    position: moved.position,
                },
                sensitivity,
            );
        }
    } else {
        cursor_moves.clear();
        if state.drag.is_some() {
            pointer_sample(
                &mut state,
                PointerSample {
                    engaged: false,
                    position: Vec2::ZERO,
                },
                sensitivity,
            );
        }
    }
}

/// Reset the body when a [`RestartFlight`] arrives.
///
/// Keys still held through the restart stay active: the reset body starts
/// with whatever bound keys are physically down.
pub fn restart_system(
    mut requests: MessageReader<RestartFlight>,
    keys: Res<ButtonInput<KeyCode>>,
    bindings: Res<KeyBindings>,
    mut q_body: Query<&mut FlightState>,
) {
    if requests.read().count() == 0 {
        return;
    }
    for mut state in q_body.iter_mut() {
        state.reset();
        for (key, action) in bindings.actions.iter() {
            if keys.pressed(*key) {
                state.inputs.press(*action);
            }
        }
    }
    info!("[flight] Restarted at origin");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flight::state::GravityRegime;

    fn input_test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_message::<RestartFlight>();
        app.add_message::<CursorMoved>();
        app.init_resource::<ButtonInput<KeyCode>>();
        app.init_resource::<ButtonInput<MouseButton>>();
        app.init_resource::<KeyBindings>();
        app.insert_resource(FlightConfig::default());
        app.add_systems(
            Update,
            (keyboard_input_system, pointer_input_system, restart_system).chain(),
        );
        app
    }

    fn body(app: &mut App) -> Entity {
        app.world_mut().spawn(FlightState::new()).id()
    }

    fn state(app: &App, entity: Entity) -> &FlightState {
        app.world().get::<FlightState>(entity).unwrap()
    }

    fn move_cursor(app: &mut App, x: f32, y: f32) {
        app.world_mut().write_message(CursorMoved {
            window: Entity::PLACEHOLDER,
            position: Vec2::new(x, y),
            delta: None,
        });
    }

    #[test]
    fn press_and_release_edges_update_held_actions() {
        let mut app = input_test_app();
        let e = body(&mut app);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        app.update();
        assert!(state(&app, e).inputs.is_held(ControlAction::ThrustForward));

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.release(KeyCode::KeyW);
        }
        app.update();
        assert!(!state(&app, e).inputs.is_held(ControlAction::ThrustForward));
    }

    #[test]
    fn shared_action_stays_held_until_last_key_released() {
        let mut app = input_test_app();
        app.world_mut()
            .resource_mut::<KeyBindings>()
            .actions
            .insert(KeyCode::ArrowUp, ControlAction::ThrustForward);
        let e = body(&mut app);

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.press(KeyCode::KeyW);
            keys.press(KeyCode::ArrowUp);
        }
        app.update();
        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.release(KeyCode::KeyW);
        }
        app.update();
        assert!(state(&app, e).inputs.is_held(ControlAction::ThrustForward));
    }

    #[test]
    fn restart_key_resets_the_body() {
        let mut app = input_test_app();
        let e = body(&mut app);
        {
            let mut s = app.world_mut().get_mut::<FlightState>(e).unwrap();
            s.body.position = Vec3::new(5.0, 5.0, 5.0);
            s.regime = GravityRegime::Planar;
        }

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyR);
        app.update();

        assert_eq!(*state(&app, e), FlightState::new());
    }

    #[test]
    fn thrust_held_through_restart_stays_active() {
        let mut app = input_test_app();
        let e = body(&mut app);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        app.update();
        app.world_mut()
            .get_mut::<FlightState>(e)
            .unwrap()
            .body
            .position = Vec3::new(0.0, 0.0, -30.0);

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.press(KeyCode::KeyR);
        }
        app.update();

        let s = state(&app, e);
        assert_eq!(s.body.position, Vec3::ZERO);
        assert!(s.inputs.is_held(ControlAction::ThrustForward));
        assert_eq!(s.inputs.iter_held().count(), 1);
    }

    #[test]
    fn drag_rotates_only_while_button_held() {
        let mut app = input_test_app();
        let e = body(&mut app);

        // Press with a cursor sample: starts the session, no rotation.
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .press(MouseButton::Left);
        move_cursor(&mut app, 100.0, 100.0);
        app.update();
        assert!(state(&app, e).drag.is_some());
        assert_eq!(state(&app, e).body.orientation, Quat::IDENTITY);

        // Held: movement rotates.
        app.world_mut()
            .resource_mut::<ButtonInput<MouseButton>>()
            .clear();
        move_cursor(&mut app, 160.0, 100.0);
        app.update();
        let turned = state(&app, e).body.orientation;
        assert_ne!(turned, Quat::IDENTITY);

        // Released: session dropped, movement ignored.
        {
            let mut buttons = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
            buttons.clear();
            buttons.release(MouseButton::Left);
        }
        move_cursor(&mut app, 400.0, 300.0);
        app.update();
        assert!(state(&app, e).drag.is_none());
        assert_eq!(state(&app, e).body.orientation, turned);
    }
}
