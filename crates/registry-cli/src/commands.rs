//! Subcommand dispatch over the page controllers

use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use registry_model::{GroupId, MarkId, NewStudent, StudentId, SubjectId};
use registry_pages::{App, CreateOutcome, Notification};
use std::io::Write;

fn id<T: From<i64>>(args: &ArgMatches, name: &str) -> Result<T> {
    args.get_one::<i64>(name)
        .copied()
        .map(T::from)
        .with_context(|| format!("missing argument <{name}>"))
}

fn text<'a>(args: &'a ArgMatches, name: &str) -> Result<&'a str> {
    args.get_one::<String>(name)
        .map(String::as_str)
        .with_context(|| format!("missing argument <{name}>"))
}

/// Run one subcommand, writing its rows to `out`
pub(crate) async fn run(app: &mut App, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    match matches.subcommand() {
        Some(("groups", args)) => groups(app, args, out).await,
        Some(("students", args)) => students(app, args, out).await,
        Some(("subjects", args)) => subjects(app, args, out).await,
        Some(("marks", args)) => marks(app, args, out).await,
        Some(("links", args)) => links(app, args, out).await,
        Some((other, _)) => bail!("unknown command `{other}`"),
        None => bail!("no command given"),
    }
}

async fn groups(app: &mut App, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let page = &mut app.groups;
    match matches.subcommand() {
        Some(("list", args)) => {
            page.load().await;
            if let Some(term) = args.get_one::<String>("search") {
                page.set_search(term.as_str());
            }
            for group in page.visible() {
                writeln!(out, "{}\t{}\t{}", group.id, group.name, group.status)?;
            }
        }
        Some(("show", args)) => {
            if let Some(group) = page.view(id::<GroupId>(args, "id")?).await {
                writeln!(out, "id:     {}", group.id)?;
                writeln!(out, "name:   {}", group.name)?;
                writeln!(out, "status: {}", group.status)?;
            }
        }
        Some(("create", args)) => {
            let members = text(args, "students")?;
            if let Some(group) = page.create(text(args, "name")?, members).await {
                writeln!(out, "{}\t{}", group.id, group.name)?;
            }
        }
        Some(("delete", args)) => {
            page.delete(id::<GroupId>(args, "id")?).await;
        }
        _ => bail!("unknown groups command"),
    }
    Ok(())
}

async fn students(app: &mut App, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let page = &mut app.students;
    match matches.subcommand() {
        Some(("list", _)) => {
            page.load().await;
            for student in page.students() {
                let group = student
                    .group
                    .as_ref()
                    .map(|g| g.name.clone().unwrap_or_else(|| g.id.to_string()))
                    .unwrap_or_default();
                writeln!(out, "{}\t{}\t{}\t{}", student.id, student.name, student.age, group)?;
            }
        }
        Some(("create", args)) => {
            let age = args.get_one::<i32>("age").copied().context("missing argument <age>")?;
            let mut draft = NewStudent::new(text(args, "name")?, age);
            if let Some(group) = args.get_one::<i64>("group") {
                draft = draft.in_group(GroupId::new(*group));
            }
            if let Some(CreateOutcome::Confirmed(student)) = page.create(draft).await {
                writeln!(out, "{}\t{}", student.id, student.name)?;
            }
        }
        Some(("update", args)) => {
            let target = id::<StudentId>(args, "id")?;
            page.load().await;
            let mut found = true;
            if let Some(name) = args.get_one::<String>("name") {
                found &= page.edit_name(target, name.as_str());
            }
            if let Some(age) = args.get_one::<i32>("age") {
                found &= page.edit_age(target, *age);
            }
            if !found || page.students().iter().all(|s| s.id != target) {
                bail!("student {target} not found");
            }
            if let Some(student) = page.save(target).await {
                writeln!(out, "{}\t{}\t{}", student.id, student.name, student.age)?;
            }
        }
        Some(("delete", args)) => {
            page.delete(id::<StudentId>(args, "id")?).await;
        }
        _ => bail!("unknown students command"),
    }
    Ok(())
}

async fn subjects(app: &mut App, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let page = &mut app.subjects;
    match matches.subcommand() {
        Some(("list", _)) => {
            page.load().await;
            for subject in page.subjects() {
                writeln!(out, "{}\t{}", subject.id, subject.name)?;
            }
        }
        Some(("create", args)) => {
            if let Some(subject) = page.create(text(args, "name")?).await {
                writeln!(out, "{}\t{}", subject.id, subject.name)?;
            }
        }
        Some(("delete", args)) => {
            page.delete(id::<SubjectId>(args, "id")?).await;
        }
        _ => bail!("unknown subjects command"),
    }
    Ok(())
}

async fn marks(app: &mut App, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let page = &mut app.marks;
    match matches.subcommand() {
        Some(("list", _)) => {
            page.load().await;
            for row in page.rows() {
                writeln!(
                    out,
                    "{}\t{}\t{}\t{}\t{}",
                    row.mark.id, row.student_name, row.subject_name, row.mark.value, row.band
                )?;
            }
        }
        Some(("create", args)) => {
            let student = args.get_one::<i64>("student").copied().map(StudentId::new);
            let subject = args.get_one::<i64>("subject").copied().map(SubjectId::new);
            let value = args.get_one::<i32>("value").copied();
            page.create(student, subject, value).await;
        }
        Some(("delete", args)) => {
            page.delete(id::<MarkId>(args, "id")?).await;
        }
        Some(("average", args)) => {
            let average = match args.get_one::<i64>("student") {
                Some(student) => page.average_for_student(StudentId::new(*student)).await,
                None => page.average_for_subject(id::<SubjectId>(args, "subject")?).await,
            };
            if let Some(average) = average {
                writeln!(out, "{average:.2}")?;
            }
        }
        _ => bail!("unknown marks command"),
    }
    Ok(())
}

async fn links(app: &mut App, matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let page = &mut app.links;
    match matches.subcommand() {
        Some(("show", args)) => {
            page.select(id::<StudentId>(args, "student")?).await;
        }
        Some(("add", args)) => {
            page.select(id::<StudentId>(args, "student")?).await;
            let subjects: Vec<SubjectId> = args
                .get_many::<i64>("subjects")
                .into_iter()
                .flatten()
                .map(|id| SubjectId::new(*id))
                .collect();
            match subjects.as_slice() {
                [single] => page.link(*single).await,
                many => page.link_many(many).await,
            };
        }
        Some(("remove", args)) => {
            page.select(id::<StudentId>(args, "student")?).await;
            page.unlink(id::<SubjectId>(args, "subject")?).await;
        }
        _ => bail!("unknown links command"),
    }
    for subject in page.subjects() {
        writeln!(out, "{}\t{}", subject.id, subject.name)?;
    }
    Ok(())
}

/// Take every visible notification off the pages
pub(crate) fn drain_notices(app: &mut App) -> Vec<Notification> {
    let mut all = Vec::new();
    for center in [
        app.groups.notices(),
        app.students.notices(),
        app.subjects.notices(),
        app.marks.notices(),
        app.links.notices(),
    ] {
        all.extend(center.active().iter().cloned());
        center.dismiss_all();
    }
    all
}
