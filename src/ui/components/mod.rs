pub mod progress_bar;
pub mod results_view;
pub mod settings_panel;
pub mod stats_header;
pub mod word_stream;
