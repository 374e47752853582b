mod declaration;
mod descriptor;
mod installed;
mod project;

pub use declaration::{CopyTarget, FORCE_MARKER, MappingPair, PluginDeclaration};
pub use descriptor::{
    MANIFEST_FILE, PLUGIN_PACKAGE_TYPE, PROJECT_TYPE, PackageDescriptor, validate_name,
};
pub use installed::{INSTALLED_FILE, InstalledPackage, InstalledRepository};
pub use project::ProjectKind;
