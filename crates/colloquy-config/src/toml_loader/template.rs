//! Default TOML config template content.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Colloquy Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[provider]
# kind = "groq"                 # groq, gemini
# model = "llama-3.3-70b-versatile"
# api_key = ""                  # prefer GROQ_API_KEY / GEMINI_API_KEY or secrets.toml
# fallback_api_key = ""         # used only when nothing else provides a key
# base_url = ""
# temperature = 0.7             # 0.0-2.0
# top_p = 1.0                   # 0.0-1.0
# max_tokens = 1024             # 1-32768
# stream = true
# request_timeout_secs = 120    # 1-600

[persona]
# default = "ingres"            # ingres, general

[session]
# greeting = "Hello! I am your INGRES virtual assistant. How can I help you?"
# history = "full"              # or { last_turns = 10 }

[voice]
# enabled = true
# recorder_command = ["sox", "-q", "-d", "-t", "wav", "-r", "16000", "-c", "1", "-b", "16", "-",
#                     "silence", "1", "0.1", "1%", "1", "1.5", "1%", "trim", "0", "{phrase_limit}"]
# listen_timeout_secs = 5       # 1-60
# phrase_time_limit_secs = 10   # 1-120
# model = "whisper-large-v3"
# language = "en"

[logging]
# level = "info"                # trace, debug, info, warn, error
"##
    .to_string()
}
