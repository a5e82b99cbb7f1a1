use serde::Serialize;

/// Consumer thread owning one queue and one runloop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Destination {
    /// UI thread: gestures, country info, query answers surfaced to the user.
    Frontend,
    /// Tile reading and geometry preparation.
    ResourceReader,
    /// Render thread owning the graphics context.
    RenderBackend,
}

impl Destination {
    /// Every destination in routing order.
    pub const ALL: [Destination; 3] = [
        Destination::Frontend,
        Destination::ResourceReader,
        Destination::RenderBackend,
    ];

    /// Short name used for thread names and logs.
    pub fn name(self) -> &'static str {
        match self {
            Destination::Frontend => "frontend",
            Destination::ResourceReader => "resource-reader",
            Destination::RenderBackend => "render-backend",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
