use bevy::prelude::*;

pub mod analysis;
pub mod clock;
pub mod forest;
pub mod geo;
pub mod incentives;
pub mod knowledge;
pub mod live_feed;
pub mod restoration;
pub mod scenario;
pub mod selection;
pub mod waste;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub struct SessionPlugin;

impl Plugin for SessionPlugin {
    fn build(&self, app: &mut App) {
        // Session-wide state that doesn't belong to any one feature
        app.init_resource::<forest::ForestDataInput>()
            .init_resource::<waste::WasteDataInput>()
            .init_resource::<incentives::PesPrograms>()
            .init_resource::<restoration::RestorationProjects>()
            .init_resource::<restoration::Partners>()
            .init_resource::<geo::UserLocation>()
            .init_resource::<selection::Selection>()
            .init_resource::<scenario::ActiveScenario>();

        app.add_plugins((analysis::AnalysisPlugin, live_feed::LiveFeedPlugin));
    }
}

#[cfg(test)]
mod plugin_tests {
    use super::*;

    #[test]
    fn test_session_plugin_initializes_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(SessionPlugin);
        app.update();
        assert!(app.world().contains_resource::<forest::ForestDataInput>());
        assert!(app.world().contains_resource::<analysis::AnalysisSessions>());
        assert!(app.world().contains_resource::<live_feed::LiveFeed>());
        assert!(app.world().contains_resource::<selection::Selection>());
    }
}
