/// Static page served at `/`. It only shows a loading banner and sends the
/// browser on to the console home.
pub const BOOTSTRAP_HTML: &str = r#"<!DOCTYPE html> <html lang="en"> <head> <title>web console</title> <style>html{font-size:62.5%;}body{margin:0;padding:0;}.bootloader{background:#6ba442;color:#FFF;position:absolute;width:100%;height:100%;margin:0;padding:0;}.bootloader .message{display:block;margin-left:40%;margin-right:40%;text-align:center;margin-top:10%;background:#FFFFFF;overflow:hidden;box-shadow:0 8px 6px -6px #313030;}.bootloader h1,.bootloader span{padding:0;margin:0;display:block;color:#313030;font-family:"Helvetica Neue",Helvetica,Arial,sans-serif;}.bootloader h1{font-size:24px;padding-top:30px;}.bootloader span{font-size:18px;padding-bottom:30px;}</style> </head> <body> <div class="bootloader"> <div class="message"> <h1>web console</h1><span>loading&hellip;</span> </div> </div> <noscript><p><a href="/_home">continue to the console</a></p></noscript> <script>window.location.replace("/_home");</script> </body> </html>
"#;
