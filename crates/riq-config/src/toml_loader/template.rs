//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> &'static str {
    r##"# RestaurantIQ assistant configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
#
# Credentials are read from the environment, never from this file:
#   GEMINI_API_KEY, SUPABASE_URL, SUPABASE_SERVICE_KEY (or SUPABASE_ANON_KEY)

[model]
# model = "gemini-2.0-flash"
# temperature = 0.7          # 0.0-2.0
# max_output_tokens = 1024   # 1-8192
# timeout_secs = 120         # 1-600

[backend]
# timeout_secs = 30          # 1-600

[session]
# max_tool_rounds = 5        # 1-20, tool calls allowed per question
# require_confirmation = false  # hold data changes until you say "yes"

[logging]
# level = "INFO"             # DEBUG, INFO, WARNING, ERROR
"##
}
