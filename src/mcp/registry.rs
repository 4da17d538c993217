/// Schema registry for the resources and tools this server advertises
///
/// Built once at startup and shared read-only afterwards. Registration
/// enforces that URIs and tool names stay unique.

use thiserror::Error;

use crate::domain::{ResourceDescriptor, ToolDescriptor};
use crate::resources::KnowledgeResource;
use crate::tools::ToolKind;

/// Errors raised when registering a descriptor
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Resource already registered: {uri}")]
    DuplicateResource { uri: String },

    #[error("Tool already registered: {name}")]
    DuplicateTool { name: String },
}

/// Ordered, de-duplicated resource and tool descriptors
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    resources: Vec<ResourceDescriptor>,
    tools: Vec<ToolDescriptor>,
}

impl SchemaRegistry {
    /// Registry with nothing in it
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding the built-in knowledge resources and tools
    pub fn new() -> Self {
        Self {
            resources: KnowledgeResource::ALL
                .iter()
                .map(|resource| resource.descriptor())
                .collect(),
            tools: ToolKind::ALL.iter().map(|tool| tool.descriptor()).collect(),
        }
    }

    pub fn list_resources(&self) -> &[ResourceDescriptor] {
        &self.resources
    }

    pub fn list_tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn resource(&self, uri: &str) -> Option<&ResourceDescriptor> {
        self.resources.iter().find(|resource| resource.uri == uri)
    }

    pub fn tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|tool| tool.name == name)
    }

    /// Names of every registered tool, in order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|tool| tool.name.clone()).collect()
    }

    /// Add a resource descriptor, rejecting a URI that is already taken
    pub fn register_resource(&mut self, descriptor: ResourceDescriptor) -> Result<(), RegistryError> {
        if self.resource(&descriptor.uri).is_some() {
            return Err(RegistryError::DuplicateResource {
                uri: descriptor.uri,
            });
        }
        self.resources.push(descriptor);
        Ok(())
    }

    /// Add a tool descriptor, rejecting a name that is already taken
    pub fn register_tool(&mut self, descriptor: ToolDescriptor) -> Result<(), RegistryError> {
        if self.tool(&descriptor.name).is_some() {
            return Err(RegistryError::DuplicateTool {
                name: descriptor.name,
            });
        }
        self.tools.push(descriptor);
        Ok(())
    }
}
