use std::{
    fs,
    io::{Cursor, Read, Seek},
    path::Path,
};

use anyhow::{anyhow, Context};
use krakatau2::lib::{
    classfile::{self, parse::Class},
    parse_utf8, ParserOptions,
};
use krakatau2::zip::ZipArchive;
use tracing::{debug, info, warn};

use crate::{
    jni::types::{parse_method_descriptor, MethodDescriptor},
    types::{ExportEvent, Stage, StageProgress},
};

const ACC_STATIC: u16 = 0x0008;
const ACC_NATIVE: u16 = 0x0100;

const PARSER_OPTIONS: ParserOptions = ParserOptions {
    no_short_code_attr: true,
};

const CLASS_EXT: &str = ".class";

// Multi-release JARs repeat classes here for newer runtimes.
const VERSIONED_PREFIX: &str = "META-INF/versions/";

/// Class entries scanned from an archive; versioned copies are left out.
pub fn is_class_entry(name: &str) -> bool {
    name.ends_with(CLASS_EXT) && !name.starts_with(VERSIONED_PREFIX)
}

/// Archives nested in an AAR that hold its classes.
fn is_aar_class_jar(name: &str) -> bool {
    name == "classes.jar" || (name.starts_with("libs/") && name.ends_with(".jar"))
}

/// Every method declared by `class`, native or not.
///
/// The owner is reported in dotted form (`com.app.Foo$Inner`). Methods whose
/// descriptor does not parse are skipped.
pub fn scan_class(class: &Class<'_>) -> anyhow::Result<Vec<MethodDescriptor>> {
    let owner = class
        .cp
        .clsutf(class.this)
        .and_then(parse_utf8)
        .ok_or_else(|| anyhow!("Class name not found in constant pool"))?
        .replace('/', ".");

    let mut methods = Vec::with_capacity(class.methods.len());
    for method in &class.methods {
        let Some(name) = class.cp.utf8(method.name).and_then(parse_utf8) else {
            warn!("skipping method with unreadable name in {}", owner);
            continue;
        };
        let Some(descriptor) = class.cp.utf8(method.desc).and_then(parse_utf8) else {
            warn!("skipping {}.{}: unreadable descriptor", owner, name);
            continue;
        };
        let (parameter_types, return_type) = match parse_method_descriptor(&descriptor) {
            Ok(parsed) => parsed,
            Err(err) => {
                warn!("skipping {}.{}{}: {}", owner, name, descriptor, err);
                continue;
            }
        };

        methods.push(MethodDescriptor {
            owner: owner.clone(),
            name,
            parameter_types,
            return_type,
            is_native: method.access & ACC_NATIVE != 0,
            is_static: method.access & ACC_STATIC != 0,
        });
    }

    Ok(methods)
}

pub fn parse_class_methods(data: &[u8]) -> anyhow::Result<Vec<MethodDescriptor>> {
    let class = classfile::parse(data, PARSER_OPTIONS).map_err(|err| anyhow!("Parse: {:?}", err))?;
    scan_class(&class)
}

/// Methods of every class file in a JAR/ZIP archive, in archive order.
pub fn scan_archive<R: Read + Seek>(
    zip: &mut ZipArchive<R>,
    mut report_progress: impl FnMut(ExportEvent),
) -> anyhow::Result<Vec<MethodDescriptor>> {
    report_progress(Stage::LoadingFileNames.into());

    let file_names = zip
        .file_names()
        .filter(|name| is_class_entry(name))
        .map(Into::into)
        .collect::<Vec<String>>();
    info!("Found {} class files", file_names.len());

    report_progress(ExportEvent {
        stage: Stage::ScanningClasses,
        progress: StageProgress::Percentage(0.0),
    });

    let mut methods = Vec::new();
    let mut skipped = 0;
    let mut data = Vec::new();
    for (idx, file_name) in file_names.iter().enumerate() {
        let mut file = zip.by_name(file_name)?;
        data.clear();
        file.read_to_end(&mut data)?;

        match parse_class_methods(&data) {
            Ok(class_methods) => {
                let natives = class_methods.iter().filter(|m| m.is_native).count();
                if natives > 0 {
                    debug!("{}: {} native methods", file_name, natives);
                }
                methods.extend(class_methods);
            }
            Err(err) => {
                warn!("skipping {}: {}", file_name, err);
                skipped += 1;
            }
        }

        if idx % 300 == 0 {
            report_progress(ExportEvent {
                stage: Stage::ScanningClasses,
                progress: StageProgress::Percentage((idx + 1) as f32 / file_names.len() as f32),
            });
        }
    }

    info!(
        "Scanned {} classes ({} skipped), {} methods, {} native",
        file_names.len() - skipped,
        skipped,
        methods.len(),
        methods.iter().filter(|m| m.is_native).count()
    );
    report_progress(ExportEvent {
        stage: Stage::ScanningClasses,
        progress: StageProgress::Done,
    });

    Ok(methods)
}

/// Methods of the class archives inside an Android AAR.
pub fn scan_aar<R: Read + Seek>(
    aar: &mut ZipArchive<R>,
    mut report_progress: impl FnMut(ExportEvent),
) -> anyhow::Result<Vec<MethodDescriptor>> {
    report_progress(Stage::LoadingFileNames.into());

    let jar_names = aar
        .file_names()
        .filter(|name| is_aar_class_jar(name))
        .map(Into::into)
        .collect::<Vec<String>>();
    if jar_names.is_empty() {
        warn!("AAR contains no classes.jar");
    }

    let mut methods = Vec::new();
    for jar_name in &jar_names {
        let mut data = Vec::new();
        aar.by_name(jar_name)?.read_to_end(&mut data)?;
        let mut jar = ZipArchive::new(Cursor::new(data))
            .with_context(|| format!("{} is not an archive", jar_name))?;
        debug!("scanning nested {}", jar_name);
        methods.extend(scan_archive(&mut jar, &mut report_progress)?);
    }

    Ok(methods)
}

/// Reads methods from a single `.class` file, an AAR, or a JAR/ZIP archive.
pub fn load_methods(
    path: impl AsRef<Path>,
    report_progress: impl FnMut(ExportEvent),
) -> anyhow::Result<Vec<MethodDescriptor>> {
    let path = path.as_ref();

    if path.extension().is_some_and(|ext| ext == "class") {
        let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        return parse_class_methods(&data).with_context(|| path.display().to_string());
    }

    let file = fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut zip = ZipArchive::new(file)
        .with_context(|| format!("{} is not a class file or archive", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "aar") {
        return scan_aar(&mut zip, report_progress);
    }
    scan_archive(&mut zip, report_progress)
}
