// crates/clipscout-ui/src/modules/mod.rs
//
// Module registry. To add a new panel:
//   1. Create modules/mypanel.rs implementing PanelModule
//   2. Add `pub mod mypanel;` below
//   3. Show it from the appropriate panel in app.rs

pub mod analyze_module;
pub mod preview_module;
pub mod video_module;

use clipscout_core::commands::AppCommand;
use clipscout_core::state::SessionState;
use egui::Ui;

/// Every panel implements this trait.
/// Modules read state, emit commands — they never mutate state directly.
pub trait PanelModule {
    fn name(&self) -> &str;
    fn ui(
        &mut self,
        ui:    &mut Ui,
        state: &SessionState,
        cmd:   &mut Vec<AppCommand>,
    );
}
