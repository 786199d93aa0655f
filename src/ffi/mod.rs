// Bindings to the JS globals loaded by index.html. No state, no logic.
pub mod mapbox;
pub mod mapillary;
