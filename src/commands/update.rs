use anyhow::{Result, anyhow, bail};
use std::path::Path;

use crate::installer::PluginInstaller;
use crate::package::PackageDescriptor;
use crate::runtime::Runtime;

use super::paths::package_dir;
use super::{GlobalOptions, Settings, print_report};

/// Update an installed plugin package from a new source directory.
#[tracing::instrument(skip(runtime, options))]
pub async fn update<R: Runtime>(runtime: R, package: &Path, options: &GlobalOptions) -> Result<()> {
    let settings = Settings::load(&runtime, options)?;
    let host = settings.host(&runtime);
    let hooks = settings.hooks();
    let installer = PluginInstaller::new(&runtime, &host, &hooks);
    let mut repo = settings.load_repo(&runtime)?;

    let dir = package_dir(&runtime, package)?;
    let target = PackageDescriptor::load_dir(&runtime, &dir)?;
    if !installer.supports(&target.package_type) {
        bail!(
            "{} is a {:?} package, not a plugin package",
            target.name,
            target.package_type
        );
    }
    let initial = repo
        .find(&target.name)
        .map(|p| p.package.clone())
        .ok_or_else(|| anyhow!("Package {} is not installed", target.name))?;

    let result = installer.update(&mut repo, &initial, &target).await;
    settings.save_repo(&runtime, &repo)?;

    let report = result?;
    print_report(&target, &report, settings.root());
    println!("Updated {} to {}", initial, target);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixture::{Project, write_json};
    use crate::commands::{install, remove};
    use crate::runtime::RealRuntime;
    use serde_json::json;
    use std::fs;

    #[tokio::test]
    async fn test_update_not_installed() {
        let project = Project::new("project");
        let theme = project.plugin("theme", "acme/theme", "1.0.0", json!({}));

        let err = update(RealRuntime, &theme, &project.options())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Package acme/theme is not installed");
    }

    #[tokio::test]
    async fn test_update_rejects_other_types() {
        let project = Project::new("project");
        let theme = project.plugin("theme", "acme/theme", "1.0.0", json!({}));
        install::install(RealRuntime, &[theme], &project.options())
            .await
            .unwrap();

        let lib = project.packages.join("lib");
        fs::create_dir_all(&lib).unwrap();
        write_json(
            &lib.join("composer.json"),
            &json!({ "name": "acme/theme", "type": "library" }),
        );

        let err = update(RealRuntime, &lib, &project.options())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("not a plugin package"));
        let record = project.installed_record();
        assert_eq!(record["packages"][0]["type"], "think-admin-plugin");
        assert_eq!(record["packages"][0]["version"], "1.0.0");
    }

    #[tokio::test]
    async fn test_update_dropping_path_override_moves_package() {
        let project = Project::new("project");
        let v1 = project.plugin(
            "theme-v1",
            "acme/theme",
            "1.0.0",
            json!({ "path": "public/theme" }),
        );
        let v2 = project.plugin("theme-v2", "acme/theme", "2.0.0", json!({}));
        install::install(RealRuntime, &[v1], &project.options())
            .await
            .unwrap();
        assert!(project.root.join("public/theme/composer.json").is_file());

        update(RealRuntime, &v2, &project.options()).await.unwrap();

        assert!(!project.root.join("public/theme").exists());
        assert!(project.root.join("vendor/acme/theme/composer.json").is_file());

        remove(RealRuntime, "acme/theme", &project.options())
            .await
            .unwrap();
        assert!(!project.root.join("vendor/acme/theme").exists());
        assert!(!project.root.join("public/theme").exists());
    }

    #[tokio::test]
    async fn test_update_forces_marked_targets() {
        let project = Project::new("project");
        let plugin = json!({ "copy": { "views": "!app/view/theme", "logo.png": "public/logo.png" } });

        let v1 = project.plugin("theme-v1", "acme/theme", "1.0.0", plugin.clone());
        fs::create_dir_all(v1.join("views")).unwrap();
        fs::write(v1.join("views/index.html"), "v1").unwrap();
        fs::write(v1.join("logo.png"), "v1").unwrap();
        install::install(RealRuntime, &[v1], &project.options())
            .await
            .unwrap();

        let v2 = project.plugin("theme-v2", "acme/theme", "2.0.0", plugin);
        fs::create_dir_all(v2.join("views")).unwrap();
        fs::write(v2.join("views/home.html"), "v2").unwrap();
        fs::write(v2.join("logo.png"), "v2").unwrap();
        update(RealRuntime, &v2, &project.options()).await.unwrap();

        let root = &project.root;
        assert!(!root.join("app/view/theme/index.html").exists());
        assert_eq!(
            fs::read_to_string(root.join("app/view/theme/home.html")).unwrap(),
            "v2"
        );
        assert_eq!(fs::read_to_string(root.join("public/logo.png")).unwrap(), "v2");
        assert_eq!(project.installed_record()["packages"][0]["version"], "2.0.0");
    }
}
