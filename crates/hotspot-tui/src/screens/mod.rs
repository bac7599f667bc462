//! Screen implementations. Each screen is a top-level [`Component`].

mod clients;
mod config;
mod status;

use crate::component::Component;
use crate::screen::ScreenId;

use clients::ClientsScreen;
use config::ConfigScreen;
use status::StatusScreen;

pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    let screens: [(ScreenId, Box<dyn Component>); 3] = [
        (ScreenId::Config, Box::new(ConfigScreen::new())),
        (ScreenId::Clients, Box::new(ClientsScreen::new())),
        (ScreenId::Status, Box::new(StatusScreen::new())),
    ];
    screens.into()
}
