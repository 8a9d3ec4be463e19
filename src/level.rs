//! Level flow.
//!
//! Scene loading itself belongs to the game; this module decides *which*
//! scene to load. Requests come in as [`LevelCommand`] events and leave as
//! [`SceneRequest`] events. Invalid requests are logged and dropped, the game
//! stays on its current scene.

use bevy::prelude::*;

use crate::error::LevelError;
use crate::events::Died;

/// Ask the game to load a scene by name.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SceneRequest {
    pub scene: String,
}

impl SceneRequest {
    pub fn new(scene: impl Into<String>) -> Self {
        Self {
            scene: scene.into(),
        }
    }
}

/// Name of the scene currently loaded. Kept up to date by the game.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveScene(pub String);

/// Level flow commands, typically sent by menu buttons and level exits.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCommand {
    /// Start from the first level.
    StartGame,
    /// Load a level by its 1-based number.
    LoadLevel(usize),
    /// Advance past the active level.
    NextLevel,
    /// Return to the main menu.
    MainMenu,
    /// Reload the active scene.
    Restart,
    /// Quit the application.
    Quit,
}

/// Ordered list of level scenes plus the main menu scene.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct LevelManager {
    main_menu: String,
    levels: Vec<String>,
}

impl Default for LevelManager {
    fn default() -> Self {
        Self::new("MainMenu", ["SampleScene"])
    }
}

impl LevelManager {
    /// Create a manager from the main menu scene and the level scenes in order.
    pub fn new<I, S>(main_menu: impl Into<String>, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            main_menu: main_menu.into(),
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    /// Main menu scene name.
    pub fn main_menu(&self) -> &str {
        &self.main_menu
    }

    /// Number of levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// 1-based level number of a scene, if it is a level.
    pub fn level_number(&self, scene: &str) -> Option<usize> {
        self.levels
            .iter()
            .position(|name| name == scene)
            .map(|index| index + 1)
    }

    /// Request the main menu.
    pub fn load_main_menu(&self) -> SceneRequest {
        SceneRequest::new(self.main_menu.as_str())
    }

    /// Request a level by its 1-based number.
    pub fn load_level(&self, number: usize) -> Result<SceneRequest, LevelError> {
        if number < 1 || number > self.levels.len() {
            return Err(LevelError::InvalidLevel {
                number,
                count: self.levels.len(),
            });
        }
        Ok(SceneRequest::new(self.levels[number - 1].as_str()))
    }

    /// Request the level after `current`, or the main menu after the last one.
    pub fn next_level(&self, current: &str) -> Result<SceneRequest, LevelError> {
        let number = self
            .level_number(current)
            .ok_or_else(|| LevelError::NotALevel(current.to_owned()))?;

        if number >= self.levels.len() {
            Ok(self.load_main_menu())
        } else {
            self.load_level(number + 1)
        }
    }

    /// The scene a command leads to while `active` is loaded. `Quit` leads
    /// to no scene.
    pub fn scene_for(
        &self,
        command: LevelCommand,
        active: &str,
    ) -> Option<Result<SceneRequest, LevelError>> {
        let request = match command {
            LevelCommand::StartGame => Menu::new(self).start_game(),
            LevelCommand::LoadLevel(number) => self.load_level(number),
            LevelCommand::NextLevel => self.next_level(active),
            LevelCommand::MainMenu => Ok(self.load_main_menu()),
            LevelCommand::Restart => Ok(SceneRequest::new(active)),
            LevelCommand::Quit => return None,
        };
        Some(request)
    }
}

/// Main menu actions. Borrows the level manager it was built with.
#[derive(Debug, Clone, Copy)]
pub struct Menu<'a> {
    levels: &'a LevelManager,
}

impl<'a> Menu<'a> {
    pub fn new(levels: &'a LevelManager) -> Self {
        Self { levels }
    }

    /// Start the game at level 1.
    pub fn start_game(&self) -> Result<SceneRequest, LevelError> {
        self.levels.load_level(1)
    }

    /// Quit the application.
    pub fn quit(&self) -> AppExit {
        AppExit::Success
    }
}

/// Plugin wiring level commands to scene requests.
pub struct LevelFlowPlugin {
    levels: LevelManager,
}

impl LevelFlowPlugin {
    pub fn new(levels: LevelManager) -> Self {
        Self { levels }
    }
}

impl Default for LevelFlowPlugin {
    fn default() -> Self {
        Self::new(LevelManager::default())
    }
}

impl Plugin for LevelFlowPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.levels.clone());
        app.init_resource::<ActiveScene>();
        app.add_event::<Died>();
        app.add_event::<LevelCommand>();
        app.add_event::<SceneRequest>();

        app.add_systems(Update, (restart_on_death, dispatch_level_commands).chain());
    }
}

/// Restart the active scene when a character dies.
pub fn restart_on_death(mut deaths: EventReader<Died>, mut commands: EventWriter<LevelCommand>) {
    if deaths.read().count() > 0 {
        info!("You died!");
        commands.write(LevelCommand::Restart);
    }
}

/// Turn level commands into scene requests.
pub fn dispatch_level_commands(
    mut commands: EventReader<LevelCommand>,
    levels: Res<LevelManager>,
    active: Res<ActiveScene>,
    mut requests: EventWriter<SceneRequest>,
    mut exit: EventWriter<AppExit>,
) {
    for command in commands.read() {
        let Some(request) = levels.scene_for(*command, &active.0) else {
            exit.write(Menu::new(&levels).quit());
            continue;
        };

        match request {
            Ok(request) => {
                debug!("Loading scene {:?}", request.scene);
                requests.write(request);
            }
            Err(err) => error!("{err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> LevelManager {
        LevelManager::new("Menu", ["Forest", "Cave", "Summit"])
    }

    fn app() -> App {
        let mut app = App::new();
        app.add_plugins(LevelFlowPlugin::new(levels()));
        app
    }

    fn scene_requests(app: &App) -> Vec<String> {
        app.world()
            .resource::<Events<SceneRequest>>()
            .iter_current_update_events()
            .map(|request| request.scene.clone())
            .collect()
    }

    #[test]
    fn load_level_is_one_based() {
        let levels = levels();
        assert_eq!(levels.load_level(1), Ok(SceneRequest::new("Forest")));
        assert_eq!(levels.load_level(3), Ok(SceneRequest::new("Summit")));
    }

    #[test]
    fn load_level_rejects_out_of_range() {
        let levels = levels();
        assert_eq!(
            levels.load_level(0),
            Err(LevelError::InvalidLevel {
                number: 0,
                count: 3
            })
        );
        assert_eq!(
            levels.load_level(4),
            Err(LevelError::InvalidLevel {
                number: 4,
                count: 3
            })
        );
    }

    #[test]
    fn next_level_advances() {
        assert_eq!(levels().next_level("Forest"), Ok(SceneRequest::new("Cave")));
    }

    #[test]
    fn next_level_after_last_returns_to_menu() {
        assert_eq!(levels().next_level("Summit"), Ok(SceneRequest::new("Menu")));
    }

    #[test]
    fn next_level_from_menu_is_an_error() {
        assert_eq!(
            levels().next_level("Menu"),
            Err(LevelError::NotALevel("Menu".to_owned()))
        );
    }

    #[test]
    fn level_number_lookup() {
        let levels = levels();
        assert_eq!(levels.level_number("Cave"), Some(2));
        assert_eq!(levels.level_number("Nowhere"), None);
    }

    #[test]
    fn menu_starts_at_level_one() {
        let levels = levels();
        let menu = Menu::new(&levels);
        assert_eq!(menu.start_game(), Ok(SceneRequest::new("Forest")));
        assert_eq!(menu.quit(), AppExit::Success);
    }

    #[test]
    fn menu_with_no_levels_cannot_start() {
        let levels = LevelManager::new("Menu", Vec::<String>::new());
        assert!(Menu::new(&levels).start_game().is_err());
    }

    #[test]
    fn invalid_level_command_requests_nothing() {
        let mut app = app();
        app.world_mut().send_event(LevelCommand::LoadLevel(0));
        app.world_mut().send_event(LevelCommand::LoadLevel(9));
        app.world_mut().run_schedule(Update);

        assert!(scene_requests(&app).is_empty());

        // The dispatcher logs this error instead of loading a scene
        let err = levels()
            .scene_for(LevelCommand::LoadLevel(9), "Forest")
            .and_then(Result::err);
        assert_eq!(
            err,
            Some(LevelError::InvalidLevel {
                number: 9,
                count: 3
            })
        );
        assert_eq!(
            err.map(|err| err.to_string()).as_deref(),
            Some("invalid level number: 9 (expected 1..=3)")
        );
    }

    #[test]
    fn commands_resolve_to_scenes() {
        let levels = levels();
        assert_eq!(
            levels.scene_for(LevelCommand::Restart, "Cave"),
            Some(Ok(SceneRequest::new("Cave")))
        );
        assert_eq!(
            levels.scene_for(LevelCommand::NextLevel, "Cave"),
            Some(Ok(SceneRequest::new("Summit")))
        );
        assert_eq!(
            levels.scene_for(LevelCommand::MainMenu, "Cave"),
            Some(Ok(SceneRequest::new("Menu")))
        );
        assert_eq!(
            levels.scene_for(LevelCommand::NextLevel, "Menu"),
            Some(Err(LevelError::NotALevel("Menu".to_owned())))
        );
        assert_eq!(levels.scene_for(LevelCommand::Quit, "Cave"), None);
    }

    #[test]
    fn start_game_command_requests_first_level() {
        let mut app = app();
        app.world_mut().send_event(LevelCommand::StartGame);
        app.world_mut().run_schedule(Update);

        assert_eq!(scene_requests(&app), vec!["Forest".to_owned()]);
    }

    #[test]
    fn death_reloads_active_scene() {
        let mut app = app();
        app.insert_resource(ActiveScene("Cave".to_owned()));
        app.world_mut().send_event(Died);
        app.world_mut().run_schedule(Update);

        assert_eq!(scene_requests(&app), vec!["Cave".to_owned()]);
    }

    #[test]
    fn quit_command_exits() {
        let mut app = app();
        app.world_mut().send_event(LevelCommand::Quit);
        app.world_mut().run_schedule(Update);

        assert_eq!(app.world().resource::<Events<AppExit>>().len(), 1);
        assert!(scene_requests(&app).is_empty());
    }
}
