pub mod maptypes;
