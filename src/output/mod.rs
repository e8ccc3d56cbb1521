mod summary;

pub use summary::render_summary;
