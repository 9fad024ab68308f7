use std::path::PathBuf;

use structopt::StructOpt;

use album_mirror_api_structs::AlbumId;
use album_mirror_cli::{fetch, ApiArgs, Error, Exit};

/// Download a Flickr album and its photo metadata into a local directory.
#[derive(Debug, StructOpt)]
struct Args {
    #[structopt(flatten)]
    api_arguments: ApiArgs,

    /// Directory albums are archived into, one subdirectory per album.
    #[structopt(
        long,
        parse(from_os_str),
        default_value = "./albums",
        env = "ALBUM_MIRROR_ALBUMS_DIR"
    )]
    albums_dir: PathBuf,

    /// Flickr album (photoset) ID.
    #[structopt(name = "ALBUM_ID")]
    album_id: AlbumId,
}

#[async_std::main]
async fn main() -> Exit<Error> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::from_args();
    fetch(&args.api_arguments, &args.albums_dir, &args.album_id).await
}
