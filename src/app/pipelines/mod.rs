pub mod community_pipeline;
pub mod metadata_pipeline;

pub use community_pipeline::CommunityPipeline;
pub use metadata_pipeline::MetadataPipeline;
