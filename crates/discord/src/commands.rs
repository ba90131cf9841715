//! Slash commands for the watch list.

use {
    livewatch_watchlist::{
        AdminCommand,
        admin::{ADD_COMMAND, LIST_COMMAND, REMOVE_COMMAND},
    },
    serenity::all::{
        CommandDataOption, CommandDataOptionValue, CommandInteraction, CommandOptionType,
        CreateCommand, CreateCommandOption, Permissions,
    },
};

/// Name of the channel argument on add/remove.
pub const NAME_OPTION: &str = "name";

/// Global command set. Visible to administrators only by default.
pub fn definitions() -> Vec<CreateCommand> {
    let name_option = |description: &str| {
        CreateCommandOption::new(CommandOptionType::String, NAME_OPTION, description).required(true)
    };
    vec![
        CreateCommand::new(ADD_COMMAND)
            .description("Add a Twitch channel to the watch list")
            .add_option(name_option("Twitch channel name"))
            .default_member_permissions(Permissions::ADMINISTRATOR),
        CreateCommand::new(REMOVE_COMMAND)
            .description("Remove a Twitch channel from the watch list")
            .add_option(name_option("Twitch channel name"))
            .default_member_permissions(Permissions::ADMINISTRATOR),
        CreateCommand::new(LIST_COMMAND)
            .description("Show the watched Twitch channels")
            .default_member_permissions(Permissions::ADMINISTRATOR),
    ]
}

fn string_option<'a>(options: &'a [CommandDataOption], name: &str) -> Option<&'a str> {
    options
        .iter()
        .find(|o| o.name == name)
        .and_then(|o| match &o.value {
            CommandDataOptionValue::String(s) => Some(s.as_str()),
            _ => None,
        })
}

pub fn to_admin_command(
    interaction: &CommandInteraction,
) -> livewatch_watchlist::Result<AdminCommand> {
    AdminCommand::from_parts(
        &interaction.data.name,
        string_option(&interaction.data.options, NAME_OPTION),
    )
}
