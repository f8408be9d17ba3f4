//! Shader module descriptors.

/// Pipeline stage a shader entry point runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex stage.
    Vertex,
    /// Fragment stage.
    Fragment,
    /// Compute stage.
    Compute,
}

/// Descriptor for creating a shader module from validated WGSL source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderDescriptor {
    /// Debug label.
    pub label: Option<String>,
    /// WGSL source text.
    pub source: String,
    /// Entry points declared by the module.
    pub entry_points: Vec<(String, ShaderStage)>,
}

impl ShaderDescriptor {
    /// Create a descriptor from WGSL source.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            label: None,
            source: source.into(),
            entry_points: Vec::new(),
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add an entry point.
    pub fn with_entry_point(mut self, name: impl Into<String>, stage: ShaderStage) -> Self {
        self.entry_points.push((name.into(), stage));
        self
    }
}
