//! Game engine for a route-building board game played on land and at sea.
//!
//! The [`manager::Manager`] drives the whole game. It only ever waits on a [`interaction::Frontend`],
//! which shows a [`manager::GameState`] to players and hands their answers back.

pub mod card;
pub mod city;
pub mod config;
pub mod dealer;
pub mod error;
pub mod game_phase;
pub mod interaction;
pub mod manager;
pub mod map;
pub mod player;
