pub mod error;
pub mod mcp_api;
pub mod pokeapi;
pub mod source;
pub mod theme;
