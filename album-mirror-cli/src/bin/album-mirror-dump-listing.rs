use structopt::StructOpt;

use album_mirror_api_structs::AlbumId;
use album_mirror_cli::flickr::PhotoApi;
use album_mirror_cli::{ApiArgs, Error, Exit};

/// Print the photo listing of a Flickr album as JSON.
#[derive(Debug, StructOpt)]
struct Args {
    #[structopt(flatten)]
    api_arguments: ApiArgs,

    /// Flickr album (photoset) ID.
    #[structopt(name = "ALBUM_ID")]
    album_id: AlbumId,
}

async fn dump(args: Args) -> Result<(), Error> {
    let client = args.api_arguments.client()?;
    let photos = client.list_album_photos(&args.album_id).await?;
    log::info!("Album {} has {} photos", args.album_id, photos.len());

    println!("{}", serde_json::to_string_pretty(&photos)?);
    Ok(())
}

#[async_std::main]
async fn main() -> Exit<Error> {
    dotenv::dotenv().ok();
    env_logger::init();

    dump(Args::from_args()).await.into()
}
