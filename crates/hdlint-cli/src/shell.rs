//! Shell script detection for watch mode.

use std::path::{Path, PathBuf};

const EXTENSIONS: &[&str] = &["sh", "bash", "zsh", "ksh"];
const INTERPRETERS: &[&str] = &["sh", "bash", "zsh", "ksh", "dash", "ash"];

/// Whether `path` looks like a shell script by extension, or by the shebang
/// on the first line of `text`.
pub fn is_shell_script(path: &Path, text: &str) -> bool {
    has_shell_extension(path) || has_shell_shebang(text)
}

pub fn has_shell_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| EXTENSIONS.contains(&ext))
}

/// `#!/bin/sh`, `#!/usr/bin/env bash`, `#!/usr/bin/env -S zsh -e`, ...
pub fn has_shell_shebang(text: &str) -> bool {
    let Some(rest) = text.lines().next().and_then(|line| line.strip_prefix("#!")) else {
        return false;
    };
    let mut words = rest.split_whitespace();
    let Some(program) = words.next().map(basename) else {
        return false;
    };

    let interpreter = if program == "env" {
        words.find(|w| !w.starts_with('-')).map(basename)
    } else {
        Some(program)
    };
    interpreter.is_some_and(|name| INTERPRETERS.contains(&name))
}

fn basename(word: &str) -> &str {
    word.rsplit('/').next().unwrap_or(word)
}

/// Every shell script under `root`, skipping hidden directories.
///
/// A `root` that is itself a file is returned as-is.
pub fn shell_files(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if path.is_dir() {
                if !hidden {
                    pending.push(path);
                }
                continue;
            }
            if has_shell_extension(&path) {
                found.push(path);
            } else if let Ok(text) = std::fs::read_to_string(&path) {
                if has_shell_shebang(&text) {
                    found.push(path);
                }
            }
        }
    }

    found.sort();
    Ok(found)
}
