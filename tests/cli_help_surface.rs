mod common;

use anyhow::Result;

#[test]
fn cli_help_surface_is_stable() -> Result<()> {
    let help = common::run_valentine(&["--help"])?;
    assert!(help.contains("Usage: valentine"));
    assert!(help.contains("[COMMAND]"));
    for cmd in ["play", "link", "inspect", "phrases", "share"] {
        assert!(help.contains(cmd), "missing {cmd} in help");
    }
    assert!(help.contains("--config"));

    let link_help = common::run_valentine(&["link", "--help"])?;
    assert!(link_help.contains("Usage: valentine link"));
    assert!(link_help.contains("--name"));
    assert!(link_help.contains("--phone"));
    assert!(link_help.contains("--to"));

    Ok(())
}
