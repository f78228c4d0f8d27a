pub mod capabilities;

pub use capabilities::{
    ArtifactLocation,
    ArtifactStore,
    EmbeddedImage,
    PdfArtifact,
    PdfRasterizer,
    QrEncoder,
    RenderedDocument,
};
