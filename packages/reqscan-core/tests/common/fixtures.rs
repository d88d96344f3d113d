//! Test fixture generators
//!
//! On-disk project trees and Python snippets for the import forms reqscan
//! understands.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway project directory
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write `contents` at a root-relative path, creating parent directories
    pub fn file(self, relative: &str, contents: &str) -> Self {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent dirs");
        }
        fs::write(&path, contents).expect("write fixture file");
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }
}

/// A small web service: package with models, utils and settings
pub fn fixture_web_service() -> ProjectFixture {
    ProjectFixture::new()
        .file("service/__init__.py", "")
        .file(
            "service/app.py",
            r#"import os
import json
from flask import Flask
from service import models

app = Flask(__name__)
app.config["SECRET_KEY"] = os.environ["SECRET_KEY"]
PORT = int(os.getenv("PORT", "8000"))
"#,
        )
        .file(
            "service/models.py",
            r#"import os
import sqlalchemy as sa
from .utils import slugify

try:
    import ujson as fastjson
except ImportError:
    fastjson = None

DATABASE_URL = os.environ.get("DATABASE_URL", "sqlite:///app.db")
"#,
        )
        .file(
            "service/utils.py",
            r#"import re
import importlib

def load_backend(name):
    import yaml
    return importlib.import_module("redis" + ".client")
"#,
        )
        .file("venv/lib/site.py", "import should_not_be_seen\n")
}

/// Python text with one static import per name
pub fn fixture_static_imports(names: &[String]) -> String {
    names.iter().map(|n| format!("import {n}\n")).collect()
}

/// Late, conditional and dynamic import forms for the given names
pub fn fixture_dynamic_imports(late: &[String], guarded: &[String], dynamic: &[String]) -> String {
    let mut out = String::from("import importlib\n");
    for name in late {
        out.push_str(&format!("def load_{name}():\n    import {name}\n    return {name}\n"));
    }
    for name in guarded {
        out.push_str(&format!("try:\n    import {name}\nexcept ImportError:\n    {name} = None\n"));
    }
    for name in dynamic {
        out.push_str(&format!("importlib.import_module(\"{name}\")\n"));
    }
    out
}
