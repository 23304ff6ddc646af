//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .required(true)
        .value_parser(value_parser!(i64))
        .help(help)
}

fn groups() -> Command {
    Command::new("groups")
        .about("Manage groups")
        .subcommand_required(true)
        .subcommand(
            Command::new("list").about("List groups").arg(
                Arg::new("search")
                    .long("search")
                    .help("Show only groups whose name contains this text, ignoring case"),
            ),
        )
        .subcommand(
            Command::new("show")
                .about("Show one group")
                .arg(id_arg("id", "Group id")),
        )
        .subcommand(
            Command::new("create")
                .about("Create a group")
                .arg(Arg::new("name").required(true).help("Group name"))
                .arg(
                    Arg::new("students")
                        .long("students")
                        .default_value("")
                        .help("Comma-separated student ids, e.g. \"1, 2, 3\""),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a group")
                .arg(id_arg("id", "Group id")),
        )
}

fn students() -> Command {
    Command::new("students")
        .about("Manage students")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List students"))
        .subcommand(
            Command::new("create")
                .about("Create a student")
                .arg(Arg::new("name").required(true).help("Student name"))
                .arg(
                    Arg::new("age")
                        .required(true)
                        .value_parser(value_parser!(i32))
                        .help("Age in years"),
                )
                .arg(
                    Arg::new("group")
                        .long("group")
                        .value_parser(value_parser!(i64))
                        .help("Group id"),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Change a student's name or age")
                .arg(id_arg("id", "Student id"))
                .arg(Arg::new("name").long("name").help("New name"))
                .arg(
                    Arg::new("age")
                        .long("age")
                        .value_parser(value_parser!(i32))
                        .help("New age"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a student")
                .arg(id_arg("id", "Student id")),
        )
}

fn subjects() -> Command {
    Command::new("subjects")
        .about("Manage subjects")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List subjects"))
        .subcommand(
            Command::new("create")
                .about("Create a subject")
                .arg(Arg::new("name").required(true).help("Subject name")),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a subject")
                .arg(id_arg("id", "Subject id")),
        )
}

fn marks() -> Command {
    Command::new("marks")
        .about("Manage marks")
        .subcommand_required(true)
        .subcommand(Command::new("list").about("List marks with names and bands"))
        .subcommand(
            Command::new("create")
                .about("Give a mark")
                .arg(id_arg("student", "Student id"))
                .arg(id_arg("subject", "Subject id"))
                .arg(
                    Arg::new("value")
                        .required(true)
                        .allow_negative_numbers(true)
                        .value_parser(value_parser!(i32))
                        .help("Mark value"),
                ),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a mark")
                .arg(id_arg("id", "Mark id")),
        )
        .subcommand(
            Command::new("average")
                .about("Average mark of a student or a subject")
                .arg(
                    Arg::new("student")
                        .long("student")
                        .value_parser(value_parser!(i64))
                        .conflicts_with("subject")
                        .required_unless_present("subject")
                        .help("Student id"),
                )
                .arg(
                    Arg::new("subject")
                        .long("subject")
                        .value_parser(value_parser!(i64))
                        .help("Subject id"),
                ),
        )
}

fn links() -> Command {
    Command::new("links")
        .about("Manage student-subject links")
        .subcommand_required(true)
        .subcommand(
            Command::new("show")
                .about("Subjects of a student")
                .arg(id_arg("student", "Student id")),
        )
        .subcommand(
            Command::new("add")
                .about("Link subjects to a student")
                .arg(id_arg("student", "Student id"))
                .arg(
                    Arg::new("subjects")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(i64))
                        .help("Subject ids"),
                ),
        )
        .subcommand(
            Command::new("remove")
                .about("Unlink a subject from a student")
                .arg(id_arg("student", "Student id"))
                .arg(id_arg("subject", "Subject id")),
        )
}

/// Full command tree
pub(crate) fn build() -> Command {
    Command::new("registry")
        .version(env!("CARGO_PKG_VERSION"))
        .about("School registry administration")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("API root, overrides configuration and environment"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(groups())
        .subcommand(students())
        .subcommand(subjects())
        .subcommand(marks())
        .subcommand(links())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_tree_is_consistent() {
        build().debug_assert();
    }

    #[test]
    fn average_needs_exactly_one_target() {
        assert!(build()
            .try_get_matches_from(["registry", "marks", "average"])
            .is_err());
        assert!(build()
            .try_get_matches_from(["registry", "marks", "average", "--student", "1", "--subject", "2"])
            .is_err());
        assert!(build()
            .try_get_matches_from(["registry", "marks", "average", "--subject", "2"])
            .is_ok());
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let matches = build()
            .try_get_matches_from(["registry", "groups", "list", "--base-url", "http://h/api"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("base-url").map(String::as_str),
            Some("http://h/api")
        );
    }
}
