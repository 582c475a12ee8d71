//! Mapping from free-text language tags to file extensions.

/// Extension used for any tag that is not in the table, including the empty tag.
pub const FALLBACK_EXTENSION: &str = "txt";

/// Resolves a fenced block's language tag to a canonical file extension.
///
/// Matching is case-insensitive and exact: `"Go"`, `"go"` and `"GOLANG"` all
/// resolve to `"go"`, while `"c++"` and `"cpp"` are separate aliases that
/// happen to share an extension. Unknown tags resolve to [`FALLBACK_EXTENSION`].
pub fn resolve(language: &str) -> &'static str {
    lookup(&language.to_lowercase()).unwrap_or(FALLBACK_EXTENSION)
}

/// Looks up an already lower-cased alias.
fn lookup(alias: &str) -> Option<&'static str> {
    let extension = match alias {
        // Compiled languages
        "go" | "golang" => "go",
        "rust" => "rs",
        "c" => "c",
        "cpp" | "c++" => "cpp",
        "java" => "java",
        "kotlin" => "kt",
        "swift" => "swift",
        "csharp" | "c#" => "cs",
        "objc" => "m",
        "haskell" => "hs",
        "scala" => "scala",

        // Scripting languages
        "python" | "python3" => "py",
        "ruby" => "rb",
        "perl" => "pl",
        "php" => "php",
        "lua" => "lua",
        "r" => "R",
        "julia" => "jl",

        // Web
        "javascript" | "js" => "js",
        "typescript" | "ts" => "ts",
        "html" => "html",
        "css" => "css",
        "scss" => "scss",
        "sass" => "sass",
        "less" => "less",
        "jsx" => "jsx",
        "tsx" => "tsx",
        "vue" => "vue",
        "svelte" => "svelte",

        // Shell
        "bash" | "sh" | "shell" | "zsh" => "sh",
        "fish" => "fish",
        "powershell" | "ps1" => "ps1",

        // Data formats
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "ini" => "ini",
        "properties" => "properties",

        // Markup
        "markdown" | "md" => "md",
        "tex" | "latex" => "tex",

        // Database
        "sql" | "postgres" | "postgresql" | "mysql" | "sqlite" | "plsql" | "tsql" => "sql",

        // Other
        "dockerfile" | "docker" => "Dockerfile",
        "makefile" | "make" => "Makefile",
        "graphql" => "graphql",
        "protobuf" | "proto" => "proto",
        "diff" => "diff",
        "patch" => "patch",

        _ => return None,
    };
    Some(extension)
}
