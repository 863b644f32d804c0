//! `run()` builds the context and dispatches to one `handle_*` per subcommand.
//! Handlers call the API and hand the `CmdResult` to `render`.

use super::render::{print_messages, print_paths, print_probe, print_receptions, print_stanzas};
use super::setup::{Cli, Commands, ItemArgs, RoleArg};
use defectdesk::api::{ConfigAction, DefectApi, ItemTarget};
use defectdesk::error::Result;
use defectdesk::init::initialize;
use defectdesk::model::{DefectCategory, DefectNote};
use defectdesk::store::fs::FsKvStore;
use std::path::PathBuf;

struct AppContext {
    api: DefectApi<FsKvStore>,
}

pub fn run(cli: Cli) -> Result<()> {
    let mut ctx = init_context()?;

    match cli.command {
        Some(Commands::List) | None => handle_list(&mut ctx),
        Some(Commands::Add { manufacturer, date }) => handle_add(&mut ctx, &manufacturer, &date),
        Some(Commands::Prepare {
            manufacturer,
            date,
            article,
            category,
            quantity,
        }) => handle_prepare(&ctx, &manufacturer, &date, &article, category, quantity),
        Some(Commands::Photo {
            item,
            role,
            file,
            move_source,
        }) => handle_photo(&ctx, item, role, file, move_source),
        Some(Commands::Note {
            item,
            reason,
            template,
            description,
        }) => handle_note(&ctx, item, DefectNote::new(reason, template, description)),
        Some(Commands::Show { item }) => handle_show(&ctx, item),
        Some(Commands::Doctor) => handle_doctor(&mut ctx),
        Some(Commands::Probe) => handle_probe(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
    }
}

fn init_context() -> Result<AppContext> {
    let ctx = initialize()?;
    Ok(AppContext { api: ctx.api })
}

fn item_target(item: ItemArgs) -> Result<ItemTarget> {
    Ok(ItemTarget::new(
        item.manufacturer,
        item.date,
        DefectCategory::from_code(item.category)?,
        item.article,
        item.index,
    ))
}

fn handle_list(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.list_receptions()?;
    print_receptions(&result.receptions);
    print_messages(&result.messages);
    Ok(())
}

fn handle_add(ctx: &mut AppContext, manufacturer: &str, date: &str) -> Result<()> {
    let result = ctx.api.add_reception(manufacturer, date)?;
    print_messages(&result.messages);
    print_paths(&result.paths);
    Ok(())
}

fn handle_prepare(
    ctx: &AppContext,
    manufacturer: &str,
    date: &str,
    article: &str,
    category: u8,
    quantity: u32,
) -> Result<()> {
    let category = DefectCategory::from_code(category)?;
    let result = ctx
        .api
        .prepare_items(manufacturer, date, category, article, quantity)?;
    print_messages(&result.messages);
    print_paths(&result.paths);
    Ok(())
}

fn handle_photo(
    ctx: &AppContext,
    item: ItemArgs,
    role: RoleArg,
    file: PathBuf,
    move_source: bool,
) -> Result<()> {
    let target = item_target(item)?;
    let result = ctx
        .api
        .attach_photo(&target, role.into(), &file, move_source)?;
    print_messages(&result.messages);
    print_paths(&result.paths);
    Ok(())
}

fn handle_note(ctx: &AppContext, item: ItemArgs, note: DefectNote) -> Result<()> {
    let target = item_target(item)?;
    let result = ctx.api.write_note(&target, &note)?;
    print_messages(&result.messages);
    print_paths(&result.paths);
    Ok(())
}

fn handle_show(ctx: &AppContext, item: ItemArgs) -> Result<()> {
    let target = item_target(item)?;
    let result = ctx.api.show_note(&target)?;
    print_stanzas(&result.stanzas);
    print_messages(&result.messages);
    Ok(())
}

fn handle_doctor(ctx: &mut AppContext) -> Result<()> {
    let result = ctx.api.doctor()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_probe(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.probe()?;
    if let Some(report) = &result.probe {
        print_probe(report);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };
    let result = ctx.api.config(action)?;
    print_messages(&result.messages);
    Ok(())
}
