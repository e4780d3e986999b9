//! Build-plan boundary behaviors: empty and partial grids.

use scatgat::config::StripeConfig;
use scatgat::StripePlan;
use tempfile::TempDir;

fn template(dir: &TempDir) -> String {
    format!("{}/{{module}}_{{disk}}_{{pattern}}.sg", dir.path().display())
}

#[test]
fn build_read_plan_on_empty_stripe_yields_no_plan() {
    let dir = TempDir::new().unwrap();
    let plan = StripePlan::build_read_plan(&template(&dir), "rec", &[1, 2], &[1, 2], StripeConfig::default());
    assert!(plan.is_none());
}

#[test]
fn build_write_plan_creates_no_files_when_grid_is_empty() {
    // An empty module/disk grid means no cells to open — no files should
    // land on disk.
    let dir = TempDir::new().unwrap();
    let plan = StripePlan::build_write_plan(&template(&dir), "rec", &[], &[], StripeConfig::default());
    assert!(plan.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn build_write_plan_survives_partial_grid() {
    let dir = TempDir::new().unwrap();
    let plan = StripePlan::build_write_plan(&template(&dir), "rec", &[1, 2], &[1], StripeConfig::default())
        .expect("at least one cell should open");
    assert_eq!(plan.entry_count(), 2);
}
