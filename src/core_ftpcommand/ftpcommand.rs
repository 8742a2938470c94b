#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PWD,
    CWD,
    CDUP,
    MODE,
    STRU,
    TYPE,
    PASV,
    PORT,
    LIST,
    NLST,
    MLSD,
    DELE,
    NOOP,
    RETR,
    STOR,
    MKD,
    RMD,
    RNFR,
    RNTO,
    FEAT,
    MDTM,
    SIZE,
    SITE,
    STAT,
    SYST,
}

impl FtpCommand {
    pub fn from_mnemonic(cmd: &str) -> Option<FtpCommand> {
        match cmd {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "PWD" => Some(FtpCommand::PWD),
            "CWD" => Some(FtpCommand::CWD),
            "CDUP" => Some(FtpCommand::CDUP),
            "MODE" => Some(FtpCommand::MODE),
            "STRU" => Some(FtpCommand::STRU),
            "TYPE" => Some(FtpCommand::TYPE),
            "PASV" => Some(FtpCommand::PASV),
            "PORT" => Some(FtpCommand::PORT),
            "LIST" => Some(FtpCommand::LIST),
            "NLST" => Some(FtpCommand::NLST),
            "MLSD" => Some(FtpCommand::MLSD),
            "DELE" => Some(FtpCommand::DELE),
            "NOOP" => Some(FtpCommand::NOOP),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "MKD" => Some(FtpCommand::MKD),
            "RMD" => Some(FtpCommand::RMD),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "FEAT" => Some(FtpCommand::FEAT),
            "MDTM" => Some(FtpCommand::MDTM),
            "SIZE" => Some(FtpCommand::SIZE),
            "SITE" => Some(FtpCommand::SITE),
            "STAT" => Some(FtpCommand::STAT),
            "SYST" => Some(FtpCommand::SYST),
            _ => None,
        }
    }
}
