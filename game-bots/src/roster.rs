/// One entry in the fixed single-player bot lineup.
#[derive(Debug, Clone, Copy)]
pub struct BotSeat {
    pub name: &'static str,
    pub avatar: &'static str,
}

/// The four bots every single-player table is filled with.
pub const BOT_SEATS: &[BotSeat] = &[
    BotSeat { name: "NEXUS-7", avatar: "🤖" },
    BotSeat { name: "CIPHER", avatar: "🔮" },
    BotSeat { name: "NOVA", avatar: "⚡" },
    BotSeat { name: "VOLT", avatar: "💠" },
];

/// Used when the human does not enter a name.
pub const DEFAULT_HUMAN_NAME: &str = "AGENT";

pub const HUMAN_AVATAR: &str = "👤";
