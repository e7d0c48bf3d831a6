use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap_complete::{generate, Shell};

use crate::app::AppError;

const BIN_NAME: &str = "linkdir";

pub fn generate_completions(shell: Shell, buf: &mut dyn Write) {
    let mut cmd = crate::cli::styled_command();
    generate(shell, &mut cmd, BIN_NAME, buf);
}

fn shell_from_path(shell_var: &str) -> Option<Shell> {
    parse_shell(shell_var.rsplit('/').next()?)
}

pub fn detect_current_shell() -> Option<Shell> {
    shell_from_path(&std::env::var("SHELL").ok()?)
}

fn parse_shell(raw: &str) -> Option<Shell> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "elvish" => Some(Shell::Elvish),
        "powershell" | "pwsh" => Some(Shell::PowerShell),
        _ => None,
    }
}

fn install_path_for_home(shell: Shell, home: &Path) -> Option<PathBuf> {
    match shell {
        Shell::Bash => Some(home.join(".local/share/bash-completion/completions/linkdir")),
        Shell::Zsh => Some(home.join(".config/linkdir/completions/linkdir.zsh")),
        Shell::Fish => Some(home.join(".config/fish/completions/linkdir.fish")),
        _ => None,
    }
}

fn install_completions_for_home(shell: Shell, home: &Path) -> io::Result<PathBuf> {
    let path = install_path_for_home(shell, home).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no install path for {shell:?}"),
        )
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut buf = Vec::new();
    generate_completions(shell, &mut buf);
    std::fs::write(&path, buf)?;

    if shell == Shell::Zsh {
        patch_zshrc(home, &path)?;
    }
    Ok(path)
}

fn patch_zshrc(home: &Path, completions_path: &Path) -> io::Result<()> {
    let zshrc = home.join(".zshrc");
    let source_line = format!("source \"{}\"", completions_path.display());

    if zshrc.exists() {
        let content = std::fs::read_to_string(&zshrc)?;
        if content.contains(&source_line) {
            return Ok(());
        }
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&zshrc)?;
    writeln!(file)?;
    writeln!(file, "# linkdir shell completions")?;
    writeln!(file, "{source_line}")?;
    Ok(())
}

pub fn run_completions_command(shell_arg: Option<&str>, install: bool) -> Result<(), AppError> {
    let shell = match shell_arg {
        Some(name) => parse_shell(name)
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown shell '{name}'")))?,
        None => detect_current_shell().ok_or_else(|| {
            AppError::InvalidArgument(
                "unable to detect shell from $SHELL; pass a shell name".to_string(),
            )
        })?,
    };

    if install {
        let home = std::env::var_os("HOME").map(PathBuf::from).ok_or_else(|| {
            AppError::InvalidArgument("HOME is not set; cannot install completions".to_string())
        })?;
        let path = install_completions_for_home(shell, &home)?;
        println!("completions installed to {}", path.display());
    } else {
        let mut stdout = io::stdout().lock();
        generate_completions(shell, &mut stdout);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap_complete::Shell;
    use uuid::Uuid;

    use super::{
        generate_completions, install_completions_for_home, install_path_for_home, parse_shell,
        run_completions_command, shell_from_path,
    };

    #[test]
    fn shell_from_path_uses_basename() {
        assert_eq!(shell_from_path("/bin/zsh"), Some(Shell::Zsh));
        assert_eq!(shell_from_path("/usr/bin/bash"), Some(Shell::Bash));
        assert_eq!(shell_from_path("/usr/local/bin/fish"), Some(Shell::Fish));
        assert_eq!(shell_from_path("/usr/bin/pwsh"), Some(Shell::PowerShell));
        assert_eq!(shell_from_path("/usr/bin/csh"), None);
    }

    #[test]
    fn parse_shell_is_case_insensitive() {
        assert_eq!(parse_shell("BASH"), Some(Shell::Bash));
        assert_eq!(parse_shell("Zsh"), Some(Shell::Zsh));
        assert_eq!(parse_shell("elvish"), Some(Shell::Elvish));
        assert_eq!(parse_shell("nonsense"), None);
    }

    #[test]
    fn generate_completions_references_binary() {
        let mut buf = Vec::new();
        generate_completions(Shell::Bash, &mut buf);
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("linkdir"));
        assert!(text.contains("category"));
    }

    #[test]
    fn install_paths_exist_only_for_supported_shells() {
        let home = PathBuf::from("/tmp/test-home");
        assert!(install_path_for_home(Shell::Bash, &home).is_some());
        assert!(install_path_for_home(Shell::Fish, &home).is_some());
        assert!(install_path_for_home(Shell::Elvish, &home).is_none());
        assert!(install_path_for_home(Shell::PowerShell, &home).is_none());
    }

    #[test]
    fn zsh_install_patches_zshrc_once() {
        let home = std::env::temp_dir().join(format!("linkdir-comp-{}", Uuid::now_v7()));
        std::fs::create_dir_all(&home).expect("home should be creatable");

        let path = install_completions_for_home(Shell::Zsh, &home).expect("install should work");
        assert!(path.exists());
        install_completions_for_home(Shell::Zsh, &home).expect("reinstall should work");
        let rc = std::fs::read_to_string(home.join(".zshrc")).expect(".zshrc should exist");
        assert_eq!(rc.matches("source").count(), 1);
        assert!(rc.contains("linkdir.zsh"));

        assert!(install_completions_for_home(Shell::Elvish, &home).is_err());
        let _ = std::fs::remove_dir_all(home);
    }

    #[test]
    fn unknown_shell_name_is_rejected() {
        assert!(run_completions_command(Some("nonsense"), false).is_err());
    }
}
