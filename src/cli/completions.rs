use clap::Parser;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    deskymode completions bash > ~/.bash_completion.d/deskymode\n\n\
                  Generate zsh completions:\n    deskymode completions zsh > ~/.zfunc/_deskymode\n\n\
                  Generate fish completions:\n    deskymode completions fish > ~/.config/fish/completions/deskymode.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    pub shell: String,
}
