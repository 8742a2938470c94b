//! Post-login command dispatch.

use std::io;
use std::sync::Arc;
use tokio::net::TcpStream;

use crate::config::Config;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::parser::ParsedCommand;
use crate::core_ftpcommand::reply::Reply;
use crate::core_ftpcommand::{
    cdup, cwd, dele, feat, list, mdtm, mkd, mlsd, noop, pwd, retr, rmd, rnfr, rnto, site, size,
    stat, stor, syst, typemode,
};
use crate::core_network::{pasv, port};
use crate::session::Session;

/// What the session loop should do after a command has been handled.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Terminate,
}

/// Dispatch one parsed command to its handler.
///
/// Unknown mnemonics answer `500` and the session continues; only QUIT
/// terminates it from here.
pub async fn process_command(
    ctrl: &mut TcpStream,
    config: &Arc<Config>,
    session: &mut Session,
    parsed: &ParsedCommand,
) -> io::Result<Flow> {
    let Some(command) = FtpCommand::from_mnemonic(parsed.name()) else {
        Reply::send_line(ctrl, "500 Unknown command").await?;
        return Ok(Flow::Continue);
    };
    let arg = parsed.params();

    match command {
        FtpCommand::QUIT => {
            Reply::send_line(ctrl, "221 Goodbye").await?;
            return Ok(Flow::Terminate);
        }
        FtpCommand::USER | FtpCommand::PASS => {
            Reply::send_line(ctrl, "530 Already logged in").await?;
        }
        FtpCommand::PWD => pwd::handle_pwd_command(ctrl, config, session, arg).await?,
        FtpCommand::CWD => {
            // "CWD ." is a no-op that reports the current directory.
            if arg == "." {
                pwd::handle_pwd_command(ctrl, config, session, arg).await?
            } else {
                cwd::handle_cwd_command(ctrl, config, session, arg).await?
            }
        }
        FtpCommand::CDUP => cdup::handle_cdup_command(ctrl, config, session, arg).await?,
        FtpCommand::MODE => typemode::handle_mode_command(ctrl, config, session, arg).await?,
        FtpCommand::STRU => typemode::handle_stru_command(ctrl, config, session, arg).await?,
        FtpCommand::TYPE => typemode::handle_type_command(ctrl, config, session, arg).await?,
        FtpCommand::PASV => pasv::handle_pasv_command(ctrl, config, session, arg).await?,
        FtpCommand::PORT => port::handle_port_command(ctrl, config, session, arg).await?,
        FtpCommand::LIST => list::handle_list_command(ctrl, config, session, arg).await?,
        FtpCommand::NLST => list::handle_nlst_command(ctrl, config, session, arg).await?,
        FtpCommand::MLSD => mlsd::handle_mlsd_command(ctrl, config, session, arg).await?,
        FtpCommand::DELE => dele::handle_dele_command(ctrl, config, session, arg).await?,
        FtpCommand::NOOP => noop::handle_noop_command(ctrl, config, session, arg).await?,
        FtpCommand::RETR => retr::handle_retr_command(ctrl, config, session, arg).await?,
        FtpCommand::STOR => stor::handle_stor_command(ctrl, config, session, arg).await?,
        FtpCommand::MKD => mkd::handle_mkd_command(ctrl, config, session, arg).await?,
        FtpCommand::RMD => rmd::handle_rmd_command(ctrl, config, session, arg).await?,
        FtpCommand::RNFR => rnfr::handle_rnfr_command(ctrl, config, session, arg).await?,
        FtpCommand::RNTO => rnto::handle_rnto_command(ctrl, config, session, arg).await?,
        FtpCommand::FEAT => feat::handle_feat_command(ctrl, config, session, arg).await?,
        FtpCommand::MDTM => mdtm::handle_mdtm_command(ctrl, config, session, arg).await?,
        FtpCommand::SIZE => size::handle_size_command(ctrl, config, session, arg).await?,
        FtpCommand::SITE => site::handle_site_command(ctrl, config, session, arg).await?,
        FtpCommand::STAT => stat::handle_stat_command(ctrl, config, session, arg).await?,
        FtpCommand::SYST => syst::handle_syst_command(ctrl, config, session, arg).await?,
    }
    Ok(Flow::Continue)
}
