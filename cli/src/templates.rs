pub const BANNER: &str = r"
    ----------------------------------------

     *** WELCOME TO PARLANCE ***

    ----------------------------------------
";

pub const MENU: &str = "
================* MENU *================

[1]- Ask a question
[2]- Start chat
[3]- Chat with tools
[4]- Transcribe audio
[5]- Translate audio
[6]- Exit
";

pub const ASK_INSTRUCTIONS: &str =
    "Type your question and press ENTER. Type 'x' to go back to the MAIN menu.";

pub const CHAT_GREETING: &str = "Hello, I am a helpful assistant. Type 'exit' to quit.";

pub const SEPARATOR: &str = "-------------------------------------------------";

pub const CHAT_MODELS: &[&str] = &[
    "gpt-3.5-turbo-1106",
    "gpt-4o-mini",
    "gpt-4o",
    "gpt-4.1-mini",
];
