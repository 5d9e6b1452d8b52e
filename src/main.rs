//! # `msxdsk` command line interface
//!
//! Single-letter subcommands matching the traditional tool: `c` create,
//! `l` list, `e` extract, `a` add, `d` delete, `i` info, `f` chains,
//! `o` boot code.  An `h` suffix selects ADVH mode where supported
//! (`lh`, `eh`); ADVH images are read-only so the writing commands have
//! no `h` form.

use clap::{arg,crate_version,Command};
use msxdsk::commands;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).unwrap_or(());

    let matches = Command::new("msxdsk")
        .about("manipulate MSX-DOS 1 floppy disk images")
        .version(crate_version!())
        .arg_required_else_help(true)
        .subcommand(Command::new("c")
            .about("create a blank formatted image")
            .arg(arg!(<size> "capacity in KB: 360, 720, 1440, 2880"))
            .arg(arg!(<dsk> "path to the disk image")))
        .subcommand(Command::new("l")
            .about("list files")
            .arg(arg!(<dsk> "path to the disk image"))
            .arg(arg!([files]... "patterns, e.g. `*.BAS`, defaults to `*.*`")))
        .subcommand(Command::new("lh")
            .about("list files on an ADVH image")
            .arg(arg!(<dsk> "path to the disk image"))
            .arg(arg!([files]... "patterns, defaults to `*.*`")))
        .subcommand(Command::new("e")
            .about("extract files into the working directory")
            .arg(arg!(<dsk> "path to the disk image"))
            .arg(arg!([files]... "patterns, defaults to `*.*`")))
        .subcommand(Command::new("eh")
            .about("extract files from an ADVH image")
            .arg(arg!(<dsk> "path to the disk image"))
            .arg(arg!([files]... "patterns, defaults to `*.*`")))
        .subcommand(Command::new("a")
            .about("add host files, creating a 720 KB image if absent")
            .arg(arg!(<dsk> "path to the disk image"))
            .arg(arg!(<files>... "host files to add")))
        .subcommand(Command::new("d")
            .about("delete files")
            .arg(arg!(<dsk> "path to the disk image"))
            .arg(arg!([files]... "patterns to delete, defaults to `*.*`")))
        .subcommand(Command::new("i")
            .about("show disk information")
            .arg(arg!(<dsk> "path to the disk image")))
        .subcommand(Command::new("f")
            .about("show cluster chains")
            .arg(arg!(<dsk> "path to the disk image"))
            .arg(arg!([files]... "patterns, defaults to `*.*`")))
        .subcommand(Command::new("o")
            .about("write boot code to an image")
            .arg(arg!(<dsk> "path to the disk image"))
            .arg(arg!([files]... "boot code file")))
        .subcommand(Command::new("ch").hide(true)
            .arg(arg!([dsk])).arg(arg!([files]...)))
        .subcommand(Command::new("ah").hide(true)
            .arg(arg!([dsk])).arg(arg!([files]...)))
        .subcommand(Command::new("dh").hide(true)
            .arg(arg!([dsk])).arg(arg!([files]...)))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("c",cmd)) => commands::mkdsk::mkdsk(cmd),
        Some(("l",cmd)) => commands::catalog::catalog(cmd,false),
        Some(("lh",cmd)) => commands::catalog::catalog(cmd,true),
        Some(("e",cmd)) => commands::get::get(cmd,false),
        Some(("eh",cmd)) => commands::get::get(cmd,true),
        Some(("a",cmd)) => commands::put::put(cmd),
        Some(("d",cmd)) => commands::delete::delete(cmd),
        Some(("i",cmd)) => commands::stat::stat(cmd),
        Some(("f",cmd)) => commands::chains::chains(cmd),
        Some(("o",_)) => {
            println!("writing boot code is not implemented yet");
            Ok(())
        },
        Some(("ch",_)) | Some(("ah",_)) | Some(("dh",_)) => {
            println!("ADVH images are read-only, not supported");
            Ok(())
        },
        _ => Ok(())
    };
    if let Err(e) = result {
        eprintln!("{}",e);
        std::process::exit(commands::exit_code(&e));
    }
}
