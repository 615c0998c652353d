mod attach_player;
mod bootstrap_failed;
mod get_snapshot;
mod install_transport;
mod on_player_event;
mod page_unload;
mod playhead_tick;
mod shutdown;
mod stall_timeout;
mod start_bootstrap;

#[cfg(test)]
#[path = "../../tests/control/handlers_integration.rs"]
mod integration_tests;
